//! Client Module
//!
//! Rust client for the feed service: a state layer that fetches the
//! listing, subscribes to the broadcast channel and merges events. It
//! renders nothing itself.
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs           - Module exports and documentation
//! ├── config.rs        - Server URL configuration
//! ├── error.rs         - Client error type
//! ├── session.rs       - Explicit session value and its JSON store
//! ├── api.rs           - REST calls
//! ├── feed_state.rs    - Local feed and event merge rules
//! ├── subscription.rs  - SSE parsing and the live event channel
//! └── app.rs           - Mount / unmount lifecycle and actions
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use feedline::client::{ClientConfig, FeedApi, FeedApp};
//!
//! # async fn example() -> Result<(), feedline::client::ClientError> {
//! let mut app = FeedApp::new(FeedApi::new(ClientConfig::from_env()?));
//! app.login("alice@test.com", "password123").await?;
//! app.mount().await?;
//!
//! app.create_post("hello", None).await?;
//! while let Some(event) = app.next_event().await {
//!     println!("{} -> {} posts", event.name(), app.posts().len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod feed_state;
pub mod session;
pub mod subscription;

pub use api::{FeedApi, ImageUpload};
pub use app::FeedApp;
pub use config::ClientConfig;
pub use error::ClientError;
pub use feed_state::FeedState;
pub use session::{Session, SessionStore, SessionUser};
pub use subscription::{FeedSubscription, SseFrame, SseParser};
