/**
 * Real-time Feed Events
 *
 * This module defines the events pushed to every connected client whenever
 * feed state changes. Each event has a name (`newPost`, `postLiked`,
 * `newComment`) and a JSON payload; over Server-Sent Events the name becomes
 * the `event:` field and the payload the `data:` field.
 */
use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::post::{CommentAdded, LikeUpdate, PostView};

/// Event name for a newly created post
pub const NEW_POST: &str = "newPost";
/// Event name for a like-set change
pub const POST_LIKED: &str = "postLiked";
/// Event name for a newly added comment
pub const NEW_COMMENT: &str = "newComment";

/// A state change broadcast to all subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data")]
pub enum FeedEvent {
    #[serde(rename = "newPost")]
    NewPost(PostView),
    #[serde(rename = "postLiked")]
    PostLiked(LikeUpdate),
    #[serde(rename = "newComment")]
    NewComment(CommentAdded),
}

impl FeedEvent {
    /// Event name as seen by clients
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewPost(_) => NEW_POST,
            Self::PostLiked(_) => POST_LIKED,
            Self::NewComment(_) => NEW_COMMENT,
        }
    }

    /// Identifier of the post this event concerns
    pub fn post_id(&self) -> &str {
        match self {
            Self::NewPost(post) => &post.id,
            Self::PostLiked(update) => &update.post_id,
            Self::NewComment(added) => &added.post_id,
        }
    }

    /// Serialize only the payload (without the event name wrapper)
    pub fn payload_json(&self) -> Result<String, SharedError> {
        let json = match self {
            Self::NewPost(post) => serde_json::to_string(post)?,
            Self::PostLiked(update) => serde_json::to_string(update)?,
            Self::NewComment(added) => serde_json::to_string(added)?,
        };
        Ok(json)
    }

    /// Rebuild an event from its name and JSON payload
    pub fn from_parts(name: &str, data: &str) -> Result<Self, SharedError> {
        match name {
            NEW_POST => Ok(Self::NewPost(serde_json::from_str(data)?)),
            POST_LIKED => Ok(Self::PostLiked(serde_json::from_str(data)?)),
            NEW_COMMENT => Ok(Self::NewComment(serde_json::from_str(data)?)),
            other => Err(SharedError::unknown_event(other)),
        }
    }
}
