//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Module exports and documentation
//! ├── types.rs     - Request and response types
//! ├── register.rs  - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── me.rs        - Get current user handler
//! └── logout.rs    - Cookie clearing handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register - User registration (201)
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`get_me`** - GET /api/auth/me - Get current user info
//! - **`logout`** - POST /api/auth/logout - Clear the session cookie
//!
//! Register and login both return `{token, user}` and set the `token`
//! cookie, so browser clients and bearer-token clients work alike.

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login handler
pub mod login;

/// Get current user handler
pub mod me;

/// Logout handler
pub mod logout;

pub use types::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UserResponse};

pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use register::register;
