/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Generate JWT token
 * 4. Return token and user info, and set the session cookie
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same 401 response
 * - User passwords are never returned in responses
 */

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderName},
    response::Json,
};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `500 Internal Server Error` - If database query or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "alice@test.com",
///   "password": "password123"
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> BackendResult<([(HeaderName, String); 1], Json<AuthResponse>)> {
    tracing::info!("Login request for: {}", request.email);

    let user = get_user_by_email(&state.db_pool, &request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            BackendError::unauthorized(INVALID_CREDENTIALS)
        })?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.sessions.create_token(&user.id, &user.email, &user.username)?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok((
        [(SET_COOKIE, session_cookie(&token))],
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::backend::auth::users::create_user;
    use crate::backend::server::config::{memory_database, ServerConfig};

    async fn state_with_alice() -> AppState {
        let state = AppState::new(ServerConfig::default(), memory_database().await.unwrap());
        let password_hash = bcrypt::hash("password123", 4).unwrap();
        create_user(&state.db_pool, "alice", "alice@test.com", &password_hash)
            .await
            .unwrap();
        state
    }

    fn request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let state = state_with_alice().await;

        let (_, Json(body)) = login(State(state), Json(request("alice@test.com", "password123")))
            .await
            .unwrap();

        assert!(!body.token.is_empty());
        assert_eq!(body.user.email, "alice@test.com");
    }

    #[tokio::test]
    async fn test_login_invalid_password() {
        let state = state_with_alice().await;
        let err = login(State(state), Json(request("alice@test.com", "wrongpassword")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_user_not_found() {
        let state = state_with_alice().await;
        let err = login(State(state), Json(request("nobody@test.com", "password123")))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
