/**
 * Comment Handler
 *
 * POST /api/posts/:id/comment with `{"content": "..."}`. Comments carry no
 * length bound; only blank content is rejected.
 *
 * The post is looked up before the body is inspected, so an unknown post is
 * a 404 whatever was sent. A request without a JSON body counts as empty
 * content.
 */

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::middleware::AuthUser;
use crate::backend::posts::db;
use crate::backend::realtime::broadcast_event;
use crate::backend::server::state::AppState;
use crate::shared::post::validate_comment_content;
use crate::shared::{CommentAdded, CommentView, FeedEvent};

/// Comment request body
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CommentRequest {
    /// Missing content is treated like blank content
    #[serde(default)]
    pub content: String,
}

/// Add a comment to a post
///
/// # Errors
///
/// * `400 Bad Request` - Blank content or malformed JSON
/// * `401 Unauthorized` - Missing or invalid credential
/// * `404 Not Found` - Unknown post id (nothing stored, nothing broadcast)
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(post_id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> BackendResult<(StatusCode, Json<CommentView>)> {
    if !db::post_exists(&state.db_pool, &post_id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CommentRequest::default(),
        Err(rejection) => {
            tracing::warn!("Rejected comment body: {}", rejection.body_text());
            return Err(BackendError::validation(rejection.body_text()));
        }
    };

    validate_comment_content(&request.content)?;

    let comment = db::insert_comment(&state.db_pool, &post_id, &user.summary(), &request.content).await?;
    tracing::info!("Comment {} added to post {} by {}", comment.id, post_id, user.username);

    broadcast_event(
        &state.feed_broadcast,
        FeedEvent::NewComment(CommentAdded {
            post_id,
            comment: comment.clone(),
        }),
    );

    Ok((StatusCode::CREATED, Json(comment)))
}
