/**
 * Register Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate username format, email format and password length
 * 2. Check that neither username nor email is taken
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info, and set the session cookie
 *
 * # Validation
 *
 * - Username must be 3-30 chars, start with a letter, and contain only
 *   letters, digits and underscores
 * - Email must contain '@' character (basic validation)
 * - Password must be at least 8 characters long
 * - Username and email must be unique
 */

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderName, StatusCode},
    response::Json,
};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest, UserResponse};
use crate::backend::auth::sessions::session_cookie;
use crate::backend::auth::users::{
    create_user, get_user_by_email, get_user_by_username, is_unique_violation,
};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;

/// Minimum accepted password length
const MIN_PASSWORD_LEN: usize = 8;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Register handler
///
/// # Returns
///
/// `201 Created` with `{token, user}` and a `Set-Cookie` header carrying the
/// same token.
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username, email, or password
/// * `409 Conflict` - Username or email already taken
/// * `500 Internal Server Error` - Hashing, store, or token failure
///
/// # Example Request
///
/// ```http
/// POST /api/auth/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@test.com",
///   "password": "password123"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> BackendResult<(StatusCode, [(HeaderName, String); 1], Json<AuthResponse>)> {
    tracing::info!("Register request for username: {}, email: {}", request.username, request.email);

    if !is_valid_username(&request.username) {
        tracing::warn!("Invalid username format: {}", request.username);
        return Err(BackendError::validation(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }

    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err(BackendError::validation("Invalid email format"));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        tracing::warn!("Password too short");
        return Err(BackendError::validation("Password must be at least 8 characters"));
    }

    if get_user_by_username(&state.db_pool, &request.username).await?.is_some() {
        tracing::warn!("Username already exists: {}", request.username);
        return Err(BackendError::conflict("Username already taken"));
    }

    if get_user_by_email(&state.db_pool, &request.email).await?.is_some() {
        tracing::warn!("Email already exists: {}", request.email);
        return Err(BackendError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;

    // A concurrent registration can still win the race to the unique index.
    let user = create_user(&state.db_pool, &request.username, &request.email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                BackendError::conflict("Username or email already registered")
            } else {
                BackendError::from(e)
            }
        })?;

    let token = state.sessions.create_token(&user.id, &user.email, &user.username)?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, session_cookie(&token))],
        Json(AuthResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}
