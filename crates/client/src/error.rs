//! Error types for the Budgetwise client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the Budgetwise API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error response from the API
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rejected locally before any request was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or malformed access token
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<budgetwise_core::Error> for ClientError {
    fn from(err: budgetwise_core::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
