//! Backend Module
//!
//! This module contains all server-side code for the feed service: an Axum
//! REST API over a SQLite store, paired with a Server-Sent Events broadcast
//! channel.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`auth`** - Users, JWT sessions, authentication handlers
//! - **`middleware`** - Auth gate and post rate limiting
//! - **`posts`** - Feed store, uploads and handlers
//! - **`realtime`** - Event broadcasting and SSE subscription
//! - **`seed`** - Development account seeding
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── seed.rs         - Development accounts
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! ├── posts/          - Posts, likes, comments, uploads
//! ├── realtime/       - Event broadcasting
//! └── error/          - Error types
//! ```
//!
//! # Request Flow
//!
//! client action → REST call → auth check → store mutation → broadcast →
//! every subscriber (the originator included) reconciles its local state.
//!
//! # Thread Safety
//!
//! - `SqlitePool` and `broadcast::Sender` are cheap to clone and shared
//! - The rate limiter guards its window map with a short `Mutex`
//! - No lock is held across an `.await`

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Posts, likes, comments and uploads
pub mod posts;

/// Development account seeding
pub mod seed;

pub use error::BackendError;
pub use realtime::{broadcast_event, handle_realtime_subscription, FeedEventBroadcast};
pub use server::create_app;
