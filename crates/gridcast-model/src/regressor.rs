//! The fit/predict capability.

use crate::error::ModelError;
use ndarray::{Array1, Array2};

/// A supervised regression model
pub trait Regressor {
    /// Fit the model
    ///
    /// # Arguments
    /// * `x` - Feature matrix, one row per observation
    /// * `y` - Target per row
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError>;

    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError>;

    /// Whether `fit` has succeeded
    fn is_fitted(&self) -> bool;
}

/// Check the shapes of a training set.
pub(crate) fn check_training_set(x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
    if x.nrows() == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if let Some(row) = y.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFiniteTarget(row));
    }
    Ok(())
}
