//! Feedline - Main Library
//!
//! Feedline is a small social feed service: users register, post short
//! texts with optional images, like and comment, and every connected client
//! receives those changes live over Server-Sent Events.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between backend and client
//!   - Expanded post, comment and user summaries (the JSON wire contract)
//!   - Feed events and content validation
//!   - Error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum REST API over a SQLite store (sqlx)
//!   - JWT sessions, bcrypt passwords, post rate limiting
//!   - Image uploads and the real-time broadcast channel
//!
//! - **`client`** - Rust client state layer
//!   - REST calls, session persistence
//!   - SSE subscription and event merging
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - Enables the backend modules and binaries
//!
//! # Usage
//!
//! ## Server-Side
//!
//! ```rust,no_run
//! use feedline::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Client
//!
//! ```rust,no_run
//! use feedline::client::{ClientConfig, FeedApi, FeedApp};
//!
//! # async fn example() -> Result<(), feedline::client::ClientError> {
//! let mut app = FeedApp::new(FeedApi::new(ClientConfig::default()));
//! app.mount().await?;
//! # Ok(())
//! # }
//! ```

/// Shared types used by both backend and client
pub mod shared;

/// Backend server code (only available with `ssr` feature)
#[cfg(feature = "ssr")]
pub mod backend;

/// Client state layer
pub mod client;
