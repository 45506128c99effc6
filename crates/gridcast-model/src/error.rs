//! Model errors.

use thiserror::Error;

/// Errors that can occur while fitting or applying a model
#[derive(Debug, Error)]
pub enum ModelError {
    /// No training rows
    #[error("Empty training set")]
    EmptyTrainingSet,

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Predict called before fit
    #[error("Model has not been fitted")]
    NotFitted,

    /// A target value is NaN or infinite
    #[error("Non-finite target at row {0}")]
    NonFiniteTarget(usize),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
