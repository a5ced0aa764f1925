//! Real-time Update Module
//!
//! Fan-out of feed mutations to every connected client over Server-Sent
//! Events.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Channel type and publish helper
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! # Event Types
//!
//! | Event | Payload |
//! |---|---|
//! | `newPost` | expanded post |
//! | `postLiked` | `{postId, likes}` |
//! | `newComment` | `{postId, comment}` |
//!
//! Events are published only after the store write succeeded.

/// Event broadcasting utilities
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_event, FeedEventBroadcast};
pub use subscription::handle_realtime_subscription;
