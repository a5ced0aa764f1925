/**
 * API Route Handlers
 *
 * This module defines the REST routes of the feed service.
 *
 * # Routes
 *
 * ## Authentication
 * - `POST /api/auth/register` - User registration
 * - `POST /api/auth/login` - User login
 * - `GET /api/auth/me` - Get current user info (auth)
 * - `POST /api/auth/logout` - Clear the session cookie (auth)
 *
 * ## Feed
 * - `GET /api/posts` - Newest posts
 * - `POST /api/posts` - Create a post (auth, multipart, rate limited)
 * - `POST /api/posts/{id}/like` - Toggle like (auth)
 * - `POST /api/posts/{id}/comment` - Add a comment (auth)
 */

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::auth::{get_me, login, logout, register};
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::{add_comment, create_post, list_posts, toggle_like};
use crate::backend::server::state::AppState;

/// Room left in the request body for multipart framing and the text fields
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Configure API routes
///
/// # Authentication
///
/// Routes that only make sense for a signed-in user sit behind
/// [`auth_middleware`]. `POST /api/posts` shares its path with the public
/// listing, so it authenticates through the `AuthUser` extractor instead.
pub fn configure_api_routes(router: Router<AppState>, app_state: &AppState) -> Router<AppState> {
    let body_limit = app_state.uploads.max_bytes() + MULTIPART_OVERHEAD_BYTES;

    let protected = Router::new()
        .route("/api/auth/me", get(get_me))
        .route("/api/auth/logout", post(logout))
        .route("/api/posts/{id}/like", post(toggle_like))
        .route("/api/posts/{id}/comment", post(add_comment))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), auth_middleware));

    router
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route(
            "/api/posts",
            get(list_posts)
                .post(create_post)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .merge(protected)
}
