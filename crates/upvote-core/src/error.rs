//! Error types for upvote-core

use thiserror::Error;

use crate::models::ValidationErrors;
use crate::store::StoreError;

/// Result type alias using upvote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in upvote-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Durable store error
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Transport-level HTTP failure (connection refused, timeout, bad body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the feature API
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Health check could not reach the service
    #[error("Backend is not available")]
    BackendUnavailable,

    /// Feature not found
    #[error("{0}")]
    NotFound(String),

    /// Local validation failure, never sent to the network
    #[error("{0}")]
    Validation(ValidationErrors),

    /// Invalid input or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The view that issued the request was disposed before it settled
    #[error("Request cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error came from the network layer (transport or API status).
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Api { .. } | Self::NotFound(_) | Self::BackendUnavailable
        )
    }
}
