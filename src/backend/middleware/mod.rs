//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - Auth gate: token extraction, verification, user context
//! - **`rate_limit`** - Sliding-window limiter for post creation

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, authenticate, extract_token, AuthUser, AuthenticatedUser};
pub use rate_limit::{ClientKey, SlidingWindowLimiter};
