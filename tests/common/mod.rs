//! Common test utilities and helpers
//!
//! - Test application fixture (in-memory store, temp upload dir)
//! - Authentication test helpers
//! - Custom assertion macros
//! - Live TCP server for streaming tests

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;
pub mod live_server;

pub use auth_helpers::*;
pub use database::*;
pub use live_server::*;
