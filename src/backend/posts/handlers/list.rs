/**
 * Feed Listing Handler
 *
 * GET /api/posts. Public, unpaginated: the newest `feed_limit` posts,
 * fully expanded.
 */

use axum::{extract::State, response::Json};

use crate::backend::error::BackendResult;
use crate::backend::posts::db;
use crate::backend::server::state::AppState;
use crate::shared::PostView;

/// List the newest posts
pub async fn list_posts(State(state): State<AppState>) -> BackendResult<Json<Vec<PostView>>> {
    let posts = db::list_posts(&state.db_pool, state.config.feed_limit).await?;
    tracing::debug!("Listing {} posts", posts.len());
    Ok(Json(posts))
}
