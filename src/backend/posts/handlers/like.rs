/**
 * Like Toggle Handler
 *
 * POST /api/posts/:id/like. Flips the caller's membership in the like set,
 * returns the new list with the caller's membership, and broadcasts
 * `postLiked`.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::{FeedEvent, LikeResponse, LikeUpdate};

/// Toggle the caller's like on a post
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid credential
/// * `404 Not Found` - Unknown post id
pub async fn toggle_like(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
) -> BackendResult<Json<LikeResponse>> {
    if !db::post_exists(&state.db_pool, &post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    let (is_liked, likes) = db::toggle_like(&state.db_pool, &post_id, &user.user_id).await?;
    tracing::info!(
        "{} {} post {}",
        user.username,
        if is_liked { "liked" } else { "unliked" },
        post_id
    );

    broadcast_event(
        &state.feed_broadcast,
        FeedEvent::PostLiked(LikeUpdate {
            post_id,
            likes: likes.clone(),
        }),
    );

    Ok(Json(LikeResponse { likes, is_liked }))
}
