//! Posts Module
//!
//! The feed itself: posts, likes and comments.
//!
//! # Module Structure
//!
//! ```text
//! posts/
//! ├── mod.rs       - Module exports and documentation
//! ├── db.rs        - Store queries returning expanded views
//! ├── upload.rs    - Image attachment storage
//! └── handlers/    - HTTP handlers
//! ```

/// Store operations
pub mod db;

/// Image attachment storage
pub mod upload;

/// HTTP handlers
pub mod handlers;

pub use handlers::{add_comment, create_post, list_posts, toggle_like};
pub use upload::UploadStore;
