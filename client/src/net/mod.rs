//! Browser-side networking: wire types and the auth proxy helpers.

pub mod api;
pub mod types;
