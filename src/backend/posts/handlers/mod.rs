//! Feed Handlers Module
//!
//! - **`list_posts`** - GET /api/posts
//! - **`create_post`** - POST /api/posts (multipart, rate limited)
//! - **`toggle_like`** - POST /api/posts/:id/like
//! - **`add_comment`** - POST /api/posts/:id/comment
//!
//! Every mutation broadcasts its event after the store write and before
//! responding.

pub mod comment;
pub mod create;
pub mod like;
pub mod list;

pub use comment::{add_comment, CommentRequest};
pub use create::create_post;
pub use like::toggle_like;
pub use list::list_posts;
