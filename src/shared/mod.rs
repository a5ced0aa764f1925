//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the backend and the client. These types are the JSON wire contract of the
//! REST API and of the real-time event stream.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.
//!
//! - **`post`** - Expanded post, comment and user summaries plus content validation
//! - **`event`** - Feed events pushed over the broadcast channel
//! - **`error`** - Errors shared by both sides
//! - **`config`** - Client-facing application configuration

pub mod post;

pub mod event;

pub mod error;

pub mod config;

pub use post::{
    CommentAdded, CommentView, LikeResponse, LikeUpdate, PostView, UserSummary, MAX_POST_CHARS,
};
pub use event::FeedEvent;
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
