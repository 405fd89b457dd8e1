//! Reusable UI components.

pub mod footer;
pub mod nav_header;
pub mod toaster;
