//! Route gate: keeps signed-in browsers off the login and register pages.
//!
//! Only the presence of the access-token cookie is checked. A stale token
//! still counts as signed in here; the navigation header's "who am I" call is
//! what discovers that.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::services::session;

/// Pages an authenticated browser is bounced away from.
pub const AUTH_PAGES: [&str; 2] = ["/login", "/register"];

/// Where bounced requests land.
pub const HOME_PATH: &str = "/";

/// Path prefixes (after the leading slash) the gate never inspects.
const EXCLUDED_PREFIXES: [&str; 5] = ["api", "_next/static", "_next/image", "favicon.ico", "pkg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

#[must_use]
pub fn is_excluded(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    EXCLUDED_PREFIXES.iter().any(|prefix| rest.starts_with(prefix))
}

/// Redirect policy as a pure function of the path and token presence.
#[must_use]
pub fn gate(path: &str, has_token: bool) -> GateDecision {
    if has_token && AUTH_PAGES.contains(&path) {
        GateDecision::Redirect(HOME_PATH)
    } else {
        GateDecision::Pass
    }
}

/// Axum middleware applying [`gate`] to every non-excluded request.
pub async fn route_gate(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if is_excluded(&path) {
        return next.run(request).await;
    }

    match gate(&path, session::has_access_token(&jar)) {
        GateDecision::Redirect(to) => {
            tracing::debug!(%path, %to, "signed-in request redirected");
            Redirect::temporary(to).into_response()
        }
        GateDecision::Pass => next.run(request).await,
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
