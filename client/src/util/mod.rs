//! Pure helpers shared by pages and components.

pub mod validation;
