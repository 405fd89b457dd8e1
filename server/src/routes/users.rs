//! User profile routes.

use axum::extract::{Path, State};
use axum::response::Json;

use super::auth::{AuthSession, UserResponse};
use super::error::ApiError;
use crate::state::AppState;

/// `GET /api/users/{id}/profile`: Fetch a user record with the caller's token.
pub async fn user_profile(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .identity
        .get_user(&user_id, &session.access_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, %user_id, "profile lookup failed");
            ApiError::from(e)
        })?;

    Ok(Json(UserResponse { success: true, message: None, user }))
}
