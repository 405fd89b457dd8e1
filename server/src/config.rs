//! Environment configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything the server needs at boot is read once in `main` and handed to
//! `AppState`. Lookups go through a closure so tests can supply a map instead
//! of mutating the process environment.

use std::str::FromStr;
use std::time::Duration;

use axum_extra::extract::cookie::SameSite;

/// Upstream base URL used when neither override is set.
pub const DEFAULT_API_URL: &str = "http://localhost:5161/v1";

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid upstream base url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
}

/// Attributes applied to both session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// `None` issues browser-session cookies with no `Max-Age`.
    pub max_age: Option<time::Duration>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
            max_age: Some(time::Duration::seconds(DEFAULT_COOKIE_MAX_AGE_SECS)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the upstream identity service, without a trailing slash.
    pub api_url: String,
    pub upstream_timeout: Duration,
    pub cookies: CookieOptions,
    pub port: u16,
}

impl AppConfig {
    /// Load from the process environment (after `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved upstream base URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the resolved upstream base URL does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = resolve_api_url(lookup("PUBLIC_API_URL"), lookup("API_URL"));
        let parsed = reqwest::Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidApiUrl { url: api_url.clone(), reason: e.to_string() })?;

        let secure = lookup("COOKIE_SECURE")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(parsed.scheme() == "https");
        let http_only = lookup("COOKIE_HTTP_ONLY")
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(true);
        let same_site = match lookup("COOKIE_SAME_SITE") {
            Some(raw) => parse_same_site(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unrecognized COOKIE_SAME_SITE, using lax");
                SameSite::Lax
            }),
            None => SameSite::Lax,
        };
        let max_age_secs = parse_or(lookup("COOKIE_MAX_AGE_SECS"), "COOKIE_MAX_AGE_SECS", DEFAULT_COOKIE_MAX_AGE_SECS);
        let max_age = (max_age_secs > 0).then(|| time::Duration::seconds(max_age_secs));

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            upstream_timeout: Duration::from_secs(parse_or(
                lookup("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
            cookies: CookieOptions { http_only, secure, same_site, max_age },
            port: parse_or(lookup("PORT"), "PORT", DEFAULT_PORT),
        })
    }
}

/// Public override wins over the server-only override, which wins over the
/// local default. Blank values count as unset.
#[must_use]
pub fn resolve_api_url(public: Option<String>, server: Option<String>) -> String {
    [public, server]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_owned())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub(crate) fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(%key, %value, "invalid value, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
