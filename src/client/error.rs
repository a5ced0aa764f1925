/**
 * Client Error Types
 *
 * Every client operation returns [`ClientError`]. Server-side failures keep
 * the status code and the `error` message from the JSON error body.
 */

use thiserror::Error;

use crate::shared::ConfigError;

/// Client-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, or the raw body
        message: String,
    },

    /// Malformed JSON (session file or event payload)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Session file access failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An action needs a session and none is held
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Invalid client configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// HTTP status of a server-side failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}
