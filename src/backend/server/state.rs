/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * `FromRef` for the broadcast sender used by the SSE handler.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The SQLite connection pool (users, posts, likes, comments)
 * - The broadcast channel for real-time feed events
 * - Session token keys
 * - The post-creation rate limiter
 * - The upload store
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share:
 * - `SqlitePool` is internally reference counted
 * - `broadcast::Sender` is thread-safe and can be cloned
 * - Keys, limiter and upload store wrap their data in `Arc`
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;
use tokio::sync::broadcast;

use crate::backend::auth::sessions::SessionKeys;
use crate::backend::middleware::rate_limit::SlidingWindowLimiter;
use crate::backend::posts::upload::UploadStore;
use crate::backend::realtime::broadcast::FeedEventBroadcast;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
///
/// # Usage
///
/// ```rust,no_run
/// use feedline::backend::server::state::AppState;
/// use axum::extract::State;
///
/// async fn handler(State(app_state): State<AppState>) {
///     let subscribers = app_state.feed_broadcast.receiver_count();
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Store connection pool
    pub db_pool: SqlitePool,

    /// Broadcast channel for `newPost`, `postLiked` and `newComment`
    ///
    /// Every SSE subscriber holds a receiver; the sender is used by the
    /// mutation handlers after a successful write.
    pub feed_broadcast: FeedEventBroadcast,

    /// Keys used to issue and verify session tokens
    pub sessions: SessionKeys,

    /// Per-client sliding window applied to post creation
    pub post_limiter: SlidingWindowLimiter,

    /// Where image attachments are written
    pub uploads: UploadStore,

    /// Configuration the state was built from
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state from configuration and an open pool
    pub fn new(config: ServerConfig, db_pool: SqlitePool) -> Self {
        let (feed_broadcast, _) = broadcast::channel(config.broadcast_capacity);

        Self {
            db_pool,
            feed_broadcast,
            sessions: SessionKeys::new(&config.jwt_secret),
            post_limiter: SlidingWindowLimiter::new(config.post_rate_limit, config.post_rate_window),
            uploads: UploadStore::new(config.upload_dir.clone(), config.max_upload_bytes),
            config: Arc::new(config),
        }
    }
}

/// Lets the SSE handler extract only the broadcast sender
impl FromRef<AppState> for FeedEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.feed_broadcast.clone()
    }
}
