//! JSON error responses for the proxy endpoints.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse` impl is the
//! only place an error becomes an HTTP response, so the body shape
//! `{ success: false, message, errors? }` is uniform.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::Value;

use crate::services::identity::IdentityError;

pub(crate) const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub(crate) const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
const TRANSPORT_FAILED_MESSAGE: &str = "Upstream service unavailable";
const TIMEOUT_MESSAGE: &str = "Upstream service timed out";
const BAD_UPSTREAM_MESSAGE: &str = "Unexpected response from upstream service";
const INTERNAL_MESSAGE: &str = "An unexpected internal server error occurred.";
pub(crate) const INVALID_BODY_MESSAGE: &str = "Invalid request body";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Client input missing or malformed; never reaches upstream.
    #[error("{0}")]
    Validation(String),
    /// Upstream rejected the credentials.
    #[error("{message}")]
    Auth { status: StatusCode, message: String },
    /// No complete local session.
    #[error("Unauthorized")]
    Unauthorized,
    /// Any other upstream failure, status forwarded where the upstream gave one.
    #[error("{message}")]
    Upstream {
        status: StatusCode,
        message: String,
        errors: Option<Value>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Auth { status, .. } | Self::Upstream { status, .. } => *status,
        }
    }

    /// Login failures keep the upstream status but read as credential errors.
    #[must_use]
    pub fn from_login_failure(err: IdentityError) -> Self {
        match err {
            IdentityError::Status { status, message, .. } => Self::Auth {
                status: status_or(status, StatusCode::UNAUTHORIZED),
                message: message.unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned()),
            },
            other => Self::from(other),
        }
    }
}

fn status_or(code: u16, fallback: StatusCode) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(fallback)
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Status { status, message, errors, .. } => Self::Upstream {
                status: status_or(status, StatusCode::BAD_GATEWAY),
                message: message.unwrap_or_else(|| format!("Request failed with status code {status}")),
                errors,
            },
            IdentityError::Transport { source, .. } => Self::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: if source.is_timeout() { TIMEOUT_MESSAGE } else { TRANSPORT_FAILED_MESSAGE }.to_owned(),
                errors: None,
            },
            IdentityError::Decode { .. } => Self::Upstream {
                status: StatusCode::BAD_GATEWAY,
                message: BAD_UPSTREAM_MESSAGE.to_owned(),
                errors: None,
            },
            IdentityError::Client(_) => Self::Upstream {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: INTERNAL_MESSAGE.to_owned(),
                errors: None,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "request body rejected");
        Self::Validation(INVALID_BODY_MESSAGE.to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Upstream { message, errors, .. } => ErrorBody { success: false, message, errors },
            Self::Auth { message, .. } | Self::Validation(message) => ErrorBody { success: false, message, errors: None },
            Self::Unauthorized => ErrorBody { success: false, message: UNAUTHORIZED_MESSAGE.to_owned(), errors: None },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
