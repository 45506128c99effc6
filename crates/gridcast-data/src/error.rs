//! Error types for data operations.

use crate::fusion::FusionError;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Non-success HTTP status from the CFBD API
    #[error("HTTP {status} from {endpoint}")]
    Http {
        /// Endpoint that was queried
        endpoint: String,
        /// HTTP status code returned
        status: u16,
    },

    /// Retries exhausted for an endpoint
    #[error("Gave up on {endpoint} after {attempts} attempts: {reason}")]
    RetriesExhausted {
        /// Endpoint that was queried
        endpoint: String,
        /// Number of attempts made
        attempts: u32,
        /// Last failure observed
        reason: String,
    },

    /// Missing API credentials
    #[error("Missing API key: set CFB_API_KEY or api_key in the config file")]
    MissingApiKey,

    /// Fusion aborted
    #[error(transparent)]
    Fusion(#[from] FusionError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
