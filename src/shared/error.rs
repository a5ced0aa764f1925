//! Shared Error Types
//!
//! This module defines error types that are shared between the backend and the client.
//! These errors represent common failure cases that can occur in both contexts.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization/deserialization failures
//! - `ValidationError` - Data validation failures (post or comment body)
//! - `UnknownEvent` - A real-time event name this crate does not understand
//!
//! # Usage
//!
//! ```rust
//! use feedline::shared::error::SharedError;
//!
//! let error = SharedError::validation("content", "Post content is required");
//! ```
use thiserror::Error;

/// Shared error type
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// Serialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Error message
        message: String,
    },

    /// Validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field name that failed validation
        field: String,
        /// Error message
        message: String,
    },

    /// Event name not recognised
    #[error("Unknown event: {name}")]
    UnknownEvent {
        /// The unrecognised event name
        name: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown-event error
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
