//! Error types for feature preparation.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while preparing features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No rows to work with
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// A required column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No column matched the feature markers
    #[error("No numeric feature columns matched markers {0:?}")]
    NoFeatures(Vec<String>),
}
