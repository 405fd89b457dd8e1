//! Session cookie store.
//!
//! ARCHITECTURE
//! ============
//! A session is two independent cookies: the upstream bearer token and the
//! user id it belongs to. Nothing is persisted server-side; the cookie jar of
//! the current request/response is the whole store.
//!
//! TRADE-OFFS
//! ==========
//! A jar holding only one of the two cookies is treated as anonymous. This
//! avoids calling upstream with a token that cannot be paired with a user.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use time::Duration;

use crate::config::CookieOptions;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const USER_ID_COOKIE: &str = "userId";

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user_id: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

fn cookie_value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(Cookie::value).filter(|v| !v.is_empty())
}

/// Whether the request carries a non-empty access token, regardless of the
/// user id cookie.
#[must_use]
pub fn has_access_token(jar: &CookieJar) -> bool {
    cookie_value(jar, ACCESS_TOKEN_COOKIE).is_some()
}

/// Read the session; `None` unless both cookies are present and non-empty.
#[must_use]
pub fn read(jar: &CookieJar) -> Option<Session> {
    let access_token = cookie_value(jar, ACCESS_TOKEN_COOKIE)?;
    let user_id = cookie_value(jar, USER_ID_COOKIE)?;
    Some(Session { access_token: access_token.to_owned(), user_id: user_id.to_owned() })
}

fn build_cookie(name: &'static str, value: String, options: &CookieOptions) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path("/")
        .http_only(options.http_only)
        .same_site(options.same_site)
        .secure(options.secure);
    if let Some(max_age) = options.max_age {
        builder = builder.max_age(max_age);
    }
    builder.build()
}

fn removal_cookie(name: &'static str, options: &CookieOptions) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(options.http_only)
        .same_site(options.same_site)
        .secure(options.secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Set both session cookies.
#[must_use]
pub fn write(jar: CookieJar, session: &Session, options: &CookieOptions) -> CookieJar {
    jar.add(build_cookie(ACCESS_TOKEN_COOKIE, session.access_token.clone(), options))
        .add(build_cookie(USER_ID_COOKIE, session.user_id.clone(), options))
}

/// Expire both session cookies. Safe to call when no session exists.
#[must_use]
pub fn clear(jar: CookieJar, options: &CookieOptions) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, options))
        .add(removal_cookie(USER_ID_COOKIE, options))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
