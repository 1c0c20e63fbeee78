//! Error types for the content client.

use thiserror::Error;

/// Result type for content client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the content server or the cache.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid data: {}", .0.join("; "))]
    Rejected(Vec<String>),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Admin key not configured")]
    Disabled,

    #[error("Missing passkey")]
    MissingPasskey,

    #[error("Invalid passkey")]
    InvalidPasskey,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
