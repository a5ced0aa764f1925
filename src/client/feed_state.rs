/**
 * Client Feed State
 *
 * The client's local copy of the feed and the rules for merging broadcast
 * events into it. The server is the only source of change: the app never
 * edits this state except through [`FeedState::replace_all`] (initial fetch)
 * and [`FeedState::apply`] (broadcast events).
 *
 * # Merge Rules
 *
 * - `newPost`: prepend, unless a post with that id is already present
 * - `postLiked`: replace the matching post's like list
 * - `newComment`: append to the matching post's comments, unless a comment
 *   with that id is already present
 * - Events naming an unknown post leave the state unchanged
 */

use crate::shared::{FeedEvent, PostView};

/// Local feed, newest post first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    posts: Vec<PostView>,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a fetched listing
    pub fn from_posts(posts: Vec<PostView>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&PostView> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Replace everything with a freshly fetched listing
    pub fn replace_all(&mut self, posts: Vec<PostView>) {
        self.posts = posts;
    }

    /// Merge one broadcast event
    ///
    /// Returns whether the state changed.
    pub fn apply(&mut self, event: &FeedEvent) -> bool {
        match event {
            FeedEvent::NewPost(post) => {
                if self.post(&post.id).is_some() {
                    return false;
                }
                self.posts.insert(0, post.clone());
                true
            }
            FeedEvent::PostLiked(update) => match self.post_mut(&update.post_id) {
                Some(post) => {
                    post.likes = update.likes.clone();
                    true
                }
                None => false,
            },
            FeedEvent::NewComment(added) => match self.post_mut(&added.post_id) {
                Some(post) if !post.comments.iter().any(|c| c.id == added.comment.id) => {
                    post.comments.push(added.comment.clone());
                    true
                }
                _ => false,
            },
        }
    }

    fn post_mut(&mut self, post_id: &str) -> Option<&mut PostView> {
        self.posts.iter_mut().find(|post| post.id == post_id)
    }
}
