/**
 * Logout Handler
 *
 * POST /api/auth/logout. Tokens are stateless, so logging out only clears
 * the session cookie; a client holding the bearer token must discard it.
 */

use axum::{
    http::{header::SET_COOKIE, HeaderName},
    response::Json,
};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::sessions::expired_session_cookie;
use crate::backend::middleware::AuthUser;

/// Clear the session cookie
pub async fn logout(AuthUser(auth): AuthUser) -> ([(HeaderName, String); 1], Json<MessageResponse>) {
    tracing::info!("User logged out: {}", auth.username);

    (
        [(SET_COOKIE, expired_session_cookie())],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
