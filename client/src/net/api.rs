//! REST helpers for the auth proxy endpoints.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Failures come back as display-ready strings: the server's `message` when
//! it sent one, otherwise a fixed fallback per operation. Pages put them in
//! notifications as-is.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "hydrate"))]
use super::types::ApiMessage;
use super::types::{LoginRequest, RegisterRequest, UserProfile};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const LOGOUT_FAILED: &str = "Failed to log out";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Pick the server's message out of an error body, or fall back.
#[cfg(any(test, feature = "hydrate"))]
fn failure_message(body: Option<ApiMessage>, fallback: &str) -> String {
    body.and_then(|b| b.message)
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Fetch the currently authenticated user from `/api/auth/me`.
/// Returns `None` if not authenticated, on any failure, or on the server.
pub async fn fetch_current_user() -> Option<UserProfile> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/me")
            .send()
            .await
            .ok()?;
        if !resp.ok() {
            return None;
        }
        let body = resp.json::<super::types::MeResponse>().await.ok()?;
        if body.success { body.user } else { None }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

/// Sign in with `POST /api/auth/login`. The server sets the session cookies.
///
/// # Errors
///
/// Returns the server's message, or "Login failed" when it gave none.
pub async fn login(request: &LoginRequest) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(request)
            .map_err(|_| UNEXPECTED_ERROR.to_owned())?
            .send()
            .await
            .map_err(|_| UNEXPECTED_ERROR.to_owned())?;
        if resp.ok() {
            return Ok(());
        }
        Err(failure_message(resp.json::<ApiMessage>().await.ok(), LOGIN_FAILED))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(LOGIN_FAILED.to_owned())
    }
}

/// Create an account with `POST /api/auth/register`.
///
/// # Errors
///
/// Returns the server's message, or "Registration failed" when it gave none.
pub async fn register(request: &RegisterRequest) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/register")
            .json(request)
            .map_err(|_| UNEXPECTED_ERROR.to_owned())?
            .send()
            .await
            .map_err(|_| UNEXPECTED_ERROR.to_owned())?;
        if resp.ok() {
            return Ok(());
        }
        Err(failure_message(resp.json::<ApiMessage>().await.ok(), REGISTRATION_FAILED))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = request;
        Err(REGISTRATION_FAILED.to_owned())
    }
}

/// Sign out with `POST /api/auth/logout`.
///
/// # Errors
///
/// Returns "Failed to log out" when the request could not complete.
pub async fn logout() -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await
            .map_err(|_| LOGOUT_FAILED.to_owned())?;
        if resp.ok() {
            Ok(())
        } else {
            Err(LOGOUT_FAILED.to_owned())
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(LOGOUT_FAILED.to_owned())
    }
}
