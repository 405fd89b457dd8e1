//! Auth routes: register, login, logout, and current-user lookup.
//!
//! Each handler is a stateless translation step: parse the browser request,
//! make at most one upstream call, mutate the session cookies, and answer
//! with the `{ success, ... }` JSON envelope the front-end expects.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use crate::services::identity::{CreateUserPayload, Credentials, UserRecord};
use crate::services::session::{self, Session};
use crate::state::AppState;

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
const MISSING_CREDENTIALS_MESSAGE: &str = "Email and password are required";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Complete session read from the request cookies.
/// Use as a handler parameter to require a session; rejects with 401.
pub struct AuthSession(pub Session);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session::read(&jar).map(Self).ok_or(ApiError::Unauthorized)
    }
}

// =============================================================================
// BODIES
// =============================================================================

/// No `Debug`: carries a plaintext password.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    full_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    /// Any JSON value; string and numeric role ids both reach upstream as sent.
    #[serde(default)]
    role_id: Value,
}

impl RegisterBody {
    fn into_payload(self) -> Option<CreateUserPayload> {
        Some(CreateUserPayload {
            full_name: present(self.full_name)?,
            email: present(self.email)?,
            password: present(self.password)?,
            role_id: present_value(self.role_id)?,
        })
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: Option<String>,
    password: Option<String>,
}

impl LoginBody {
    fn into_credentials(self) -> Option<Credentials> {
        Some(Credentials { email: present(self.email)?, password: present(self.password)? })
    }
}

/// Missing, empty, and whitespace-only values all count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `null` and blank strings count as absent; everything else is kept as sent.
fn present_value(value: Value) -> Option<Value> {
    match &value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        _ => Some(value),
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserRecord,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/register`: Create the user upstream.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(body) = body?;
    let payload = body
        .into_payload()
        .ok_or_else(|| ApiError::Validation(MISSING_FIELDS_MESSAGE.to_owned()))?;

    let user = state.identity.create_user(&payload).await.map_err(|e| {
        tracing::error!(error = %e, "user registration failed");
        ApiError::from(e)
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(Json(UserResponse { success: true, message: Some("Registration successful"), user }))
}

/// `POST /api/auth/login`: Authenticate upstream, then write the session cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let Json(body) = body?;
    let credentials = body
        .into_credentials()
        .ok_or_else(|| ApiError::Validation(MISSING_CREDENTIALS_MESSAGE.to_owned()))?;

    let grant = state.identity.login(&credentials).await.map_err(|e| {
        tracing::warn!(error = %e, "login rejected");
        ApiError::from_login_failure(e)
    })?;

    let session = Session { access_token: grant.access_token, user_id: grant.user_id };
    let jar = session::write(jar, &session, &state.cookies);

    tracing::info!(user_id = %session.user_id, "session created");
    Ok((jar, Json(LoginResponse { success: true, message: "Login successful", user_id: session.user_id })))
}

/// `POST /api/auth/logout`: Expire both session cookies. Always succeeds.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Ack>) {
    let jar = session::clear(jar, &state.cookies);
    (jar, Json(Ack { success: true, message: "Logged out successfully" }))
}

/// `GET /api/auth/me`: Resolve the session to a fresh upstream user record.
///
/// An upstream 401 means the stored token is dead, so the cookies are cleared
/// along with the error response.
pub async fn me(State(state): State<AppState>, jar: CookieJar, AuthSession(session): AuthSession) -> Response {
    match state.identity.get_user(&session.user_id, &session.access_token).await {
        Ok(user) => Json(UserResponse { success: true, message: None, user }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %session.user_id, "current user lookup failed");
            let stale = e.status() == Some(StatusCode::UNAUTHORIZED.as_u16());
            let err = ApiError::from(e);
            if stale {
                (session::clear(jar, &state.cookies), err).into_response()
            } else {
                err.into_response()
            }
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
