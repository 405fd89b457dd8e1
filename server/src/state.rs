//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It is
//! immutable after boot: the upstream client and the cookie attributes. No
//! per-request data lives here.

use std::sync::Arc;

use crate::config::{AppConfig, CookieOptions};
use crate::services::identity::{IdentityApi, IdentityClient, IdentityError};

/// Clone is required by Axum; the upstream client sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityApi>,
    pub cookies: CookieOptions,
}

impl AppState {
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityApi>, cookies: CookieOptions) -> Self {
        Self { identity, cookies }
    }

    /// Build state backed by the real upstream HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, IdentityError> {
        let client = IdentityClient::new(&config.api_url, config.upstream_timeout)?;
        Ok(Self::new(Arc::new(client), config.cookies))
    }
}
