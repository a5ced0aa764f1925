//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation and layers
//! └── api_routes.rs   - REST endpoints
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use feedline::backend::routes::create_router;
//! use feedline::backend::server::{config::memory_database, AppState, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = memory_database().await?;
//! let router = create_router(AppState::new(ServerConfig::default(), pool));
//! # Ok(())
//! # }
//! ```

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
