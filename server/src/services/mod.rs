//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own upstream I/O and cookie mechanics so route handlers
//! can stay focused on request translation and response shaping.

pub mod identity;
pub mod session;
