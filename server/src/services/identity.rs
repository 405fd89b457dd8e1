//! Upstream identity service client: user creation, lookup, and login.
//!
//! ARCHITECTURE
//! ============
//! Route handlers depend on the `IdentityApi` trait rather than the concrete
//! HTTP client so they can be exercised against an in-memory double. The
//! production implementation issues exactly one request per call; there is
//! no retry or circuit breaking.
//!
//! WIRE FORMAT
//! ===========
//! User records pass through with their unknown fields intact. Two
//! normalizations apply: `id` is always re-emitted as a string (a numeric
//! upstream id `42` becomes `"42"`, matching the `userId` cookie), and a
//! null `fullName` or `email` is read as an empty string.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses keep the upstream status plus whatever human-readable
//! message and field-level `errors` the body carried, so the proxy layer can
//! forward them verbatim.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const USERS_PATH: &str = "Users";
const LOGIN_PATH: &str = "Auth/login";

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A user as returned by the upstream service.
///
/// Fields the front-end does not interpret are kept in `extra` so proxied
/// responses stay lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Body sent to `POST /Users`. Field names follow the upstream's casing.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserPayload {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "PasswordHash")]
    pub password: String,
    /// Forwarded verbatim; upstreams use either string or numeric role ids.
    #[serde(rename = "RoleId")]
    pub role_id: Value,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token and user id handed back by a successful upstream login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub access_token: String,
    pub user_id: String,
}

impl std::fmt::Debug for LoginGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginGrant")
            .field("access_token", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .finish()
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("http client init failed: {0}")]
    Client(reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport { endpoint: String, source: reqwest::Error },
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: String,
        status: u16,
        message: Option<String>,
        errors: Option<Value>,
    },
    #[error("unexpected response from {endpoint}: {detail}")]
    Decode { endpoint: String, detail: String },
}

impl IdentityError {
    /// Upstream status code, if the upstream actually answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    async fn create_user(&self, payload: &CreateUserPayload) -> Result<UserRecord, IdentityError>;

    async fn get_user(&self, id: &str, bearer: &str) -> Result<UserRecord, IdentityError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, IdentityError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
}

impl IdentityClient {
    /// Build a client bound to `base_url` with JSON headers and a fixed timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, IdentityError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(IdentityError::Client)?;

        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, endpoint: &str, request: reqwest::RequestBuilder) -> Result<Vec<u8>, IdentityError> {
        let resp = request
            .send()
            .await
            .map_err(|e| IdentityError::Transport { endpoint: endpoint.to_owned(), source: e })?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| IdentityError::Transport { endpoint: endpoint.to_owned(), source: e })?;

        if !status.is_success() {
            let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            return Err(IdentityError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                message: upstream_message(&body),
                errors: upstream_errors(&body),
            });
        }

        Ok(bytes.to_vec())
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, bytes: &[u8]) -> Result<T, IdentityError> {
    serde_json::from_slice(bytes)
        .map_err(|e| IdentityError::Decode { endpoint: endpoint.to_owned(), detail: e.to_string() })
}

#[async_trait::async_trait]
impl IdentityApi for IdentityClient {
    async fn create_user(&self, payload: &CreateUserPayload) -> Result<UserRecord, IdentityError> {
        let endpoint = format!("POST /{USERS_PATH}");
        let bytes = self
            .send(&endpoint, self.http.post(self.url(USERS_PATH)).json(payload))
            .await?;
        decode(&endpoint, &bytes)
    }

    async fn get_user(&self, id: &str, bearer: &str) -> Result<UserRecord, IdentityError> {
        let endpoint = format!("GET /{USERS_PATH}/{{id}}");
        let request = self
            .http
            .get(self.url(&format!("{USERS_PATH}/{id}")))
            .header(AUTHORIZATION, format!("Bearer {bearer}"));
        let bytes = self.send(&endpoint, request).await?;
        decode(&endpoint, &bytes)
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginGrant, IdentityError> {
        let endpoint = format!("POST /{LOGIN_PATH}");
        let bytes = self
            .send(&endpoint, self.http.post(self.url(LOGIN_PATH)).json(credentials))
            .await?;
        let body: Value = decode(&endpoint, &bytes)?;
        parse_login_grant(&body).ok_or_else(|| IdentityError::Decode {
            endpoint,
            detail: "missing access token or user id".to_owned(),
        })
    }
}

// =============================================================================
// BODY HELPERS
// =============================================================================

/// Message from an upstream error body: OData `error.message` first, then a
/// top-level `message`.
pub(crate) fn upstream_message(body: &Value) -> Option<String> {
    body.pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .filter(|m| !m.trim().is_empty())
        .map(str::to_owned)
}

/// Field-level validation errors, as .NET returns them on 400s.
pub(crate) fn upstream_errors(body: &Value) -> Option<Value> {
    body.get("errors").filter(|v| !v.is_null()).cloned()
}

/// Accepts `{accessToken, userId}`, `{token, user: {id}}`, and the
/// snake_case spellings.
pub(crate) fn parse_login_grant(body: &Value) -> Option<LoginGrant> {
    let token = ["/accessToken", "/access_token", "/token"]
        .iter()
        .find_map(|p| body.pointer(p).and_then(Value::as_str))
        .filter(|t| !t.is_empty())?;
    let user_id = ["/userId", "/user_id", "/user/id", "/id"]
        .iter()
        .find_map(|p| body.pointer(p).and_then(id_to_string))
        .filter(|id| !id.is_empty())?;

    Some(LoginGrant { access_token: token.to_owned(), user_id })
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_to_string(&value).ok_or_else(|| serde::de::Error::custom("user id must be a string or number"))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
