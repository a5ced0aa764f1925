/**
 * Feed Data Structures
 *
 * Expanded ("populated") records exactly as they travel over the wire.
 * Reference fields are replaced by embedded summaries so a client can render
 * a post without further lookups.
 *
 * # Wire Shape
 *
 * Posts and comments carry their identifier as `_id` and use camelCase
 * field names (`createdAt`, `postId`, `isLiked`). User summaries carry `id`.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;

/// Maximum post body length, counted in Unicode code points
pub const MAX_POST_CHARS: usize = 280;

/// Embedded identity summary used wherever a user is referenced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A comment with its author expanded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub author: UserSummary,
    /// Identifier of the parent post
    pub post: String,
    pub created_at: DateTime<Utc>,
}

/// A post with author, likes and comments expanded
///
/// `image` is the stored upload filename, or an empty string when the post
/// has no attachment. `likes` has set semantics: a user appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub image: String,
    pub author: UserSummary,
    #[serde(default)]
    pub likes: Vec<UserSummary>,
    #[serde(default)]
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
}

impl PostView {
    /// Whether the given user id is in this post's like set
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.id == user_id)
    }
}

/// Payload of the `postLiked` event: the full like list after a toggle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeUpdate {
    pub post_id: String,
    pub likes: Vec<UserSummary>,
}

/// Payload of the `newComment` event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentAdded {
    pub post_id: String,
    pub comment: CommentView,
}

/// Response body of the like-toggle endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: Vec<UserSummary>,
    /// The caller's membership after the toggle
    pub is_liked: bool,
}

/// Validate a post body: present, not blank, at most [`MAX_POST_CHARS`] code points
pub fn validate_post_content(content: &str) -> Result<(), SharedError> {
    if content.trim().is_empty() {
        return Err(SharedError::validation("content", "Post content is required"));
    }

    let length = content.chars().count();
    if length > MAX_POST_CHARS {
        return Err(SharedError::validation(
            "content",
            format!("Post content must be at most {} characters (got {})", MAX_POST_CHARS, length),
        ));
    }

    Ok(())
}

/// Validate a comment body: present and not blank.
///
/// Comments carry no length bound, unlike posts.
pub fn validate_comment_content(content: &str) -> Result<(), SharedError> {
    if content.trim().is_empty() {
        return Err(SharedError::validation("content", "Comment content is required"));
    }
    Ok(())
}
