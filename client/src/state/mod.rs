//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Each state type lives in an `RwSignal` provided by `App`. Components read
//! the context instead of fetching on their own.

pub mod notifications;
pub mod session;
