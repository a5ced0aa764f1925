/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * information about the currently authenticated user.
 *
 * The auth gate has already verified the token and confirmed the user
 * exists; this handler only reloads the record for its current fields.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid credential
/// * `500 Internal Server Error` - Store failure
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "username": "alice",
///   "email": "alice@test.com"
/// }
/// ```
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> BackendResult<Json<UserResponse>> {
    let user = get_user_by_id(&state.db_pool, &auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", auth.user_id);
            BackendError::unauthorized("User no longer exists")
        })?;

    Ok(Json(UserResponse::from(user)))
}
