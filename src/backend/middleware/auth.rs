/**
 * Authentication Middleware
 *
 * This module provides the auth gate for routes that require a user. It
 * extracts the session token from the `Authorization: Bearer` header or,
 * failing that, the `token` cookie, verifies it, confirms the user still
 * exists, and attaches an [`AuthenticatedUser`] to the request extensions.
 *
 * Two entry points share the same check:
 * - [`auth_middleware`] for whole route groups
 * - the [`AuthUser`] extractor, which reuses a user already attached by the
 *   middleware or runs the check itself
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::SESSION_COOKIE;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::server::state::AppState;
use crate::shared::UserSummary;

/// Authenticated user data attached to the request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl AuthenticatedUser {
    /// Summary embedded in the posts and comments this user creates
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.user_id.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Pull the raw session token out of the request headers
///
/// The bearer header wins over the cookie when both are present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Verify the request's credential and load the user it names
///
/// # Errors
///
/// * `401 Unauthorized` - No token, invalid or expired token, or unknown user
/// * `500 Internal Server Error` - Store failure
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> BackendResult<AuthenticatedUser> {
    let token = extract_token(headers).ok_or_else(|| {
        tracing::warn!("Missing session token");
        BackendError::unauthorized("Not authorized, no token")
    })?;

    let claims = state.sessions.verify_token(&token).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Not authorized, token failed")
    })?;

    let user = get_user_by_id(&state.db_pool, &claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token names unknown user: {}", claims.sub);
            BackendError::unauthorized("Not authorized, user not found")
        })?;

    Ok(AuthenticatedUser {
        user_id: user.id,
        username: user.username,
        email: user.email,
        avatar: user.avatar,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the token from the Authorization header or `token` cookie
/// 2. Verifies the token
/// 3. Checks the user still exists
/// 4. Attaches user data to request extensions for use in handlers
///
/// Returns 401 Unauthorized if any step fails.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Axum extractor for authenticated user
///
/// Handlers take this as a parameter to require an authenticated caller.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let user = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}
