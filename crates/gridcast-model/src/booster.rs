//! Gradient boosting with squared-error loss
//!
//! Starting from the target mean, each round fits a regression tree to the
//! current residual gradients (`g = prediction - y`, `h = 1`) and adds its
//! shrunken output to the running prediction.

use crate::error::ModelError;
use crate::regressor::{Regressor, check_training_set};
use crate::tree::{RegressionTree, TreeParams};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Booster hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterConfig {
    /// Number of boosting rounds (default: 200)
    pub n_estimators: usize,
    /// Shrinkage applied to every tree (default: 0.1)
    pub learning_rate: f64,
    /// Maximum tree depth (default: 6)
    pub max_depth: usize,
    /// L2 regularisation on leaf weights (default: 1.0)
    pub lambda: f64,
    /// Minimum hessian sum per child (default: 1.0)
    pub min_child_weight: f64,
}

impl Default for BoosterConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            learning_rate: 0.1,
            max_depth: 6,
            lambda: 1.0,
            min_child_weight: 1.0,
        }
    }
}

impl BoosterConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate {} must be in (0, 1]",
                self.learning_rate
            )));
        }
        if self.lambda < 0.0 || !self.lambda.is_finite() {
            return Err(ModelError::InvalidParameter(format!(
                "lambda {} must be non-negative",
                self.lambda
            )));
        }
        if self.min_child_weight < 0.0 || !self.min_child_weight.is_finite() {
            return Err(ModelError::InvalidParameter(format!(
                "min_child_weight {} must be non-negative",
                self.min_child_weight
            )));
        }
        Ok(())
    }

    const fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            lambda: self.lambda,
            min_child_weight: self.min_child_weight,
            shrinkage: self.learning_rate,
        }
    }
}

/// Boosted ensemble of regression trees
#[derive(Debug, Clone)]
pub struct GradientBoostedRegressor {
    config: BoosterConfig,
    base_score: f64,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl GradientBoostedRegressor {
    /// Create an unfitted booster.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: BoosterConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            config,
            base_score: 0.0,
            n_features: 0,
            trees: Vec::new(),
        })
    }

    /// Create with default configuration.
    ///
    /// # Errors
    /// Returns an error if the default configuration is invalid (should not happen).
    pub fn try_default() -> Result<Self, ModelError> {
        Self::new(BoosterConfig::default())
    }

    /// The active configuration.
    pub const fn config(&self) -> &BoosterConfig {
        &self.config
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Initial prediction every tree adds to.
    pub const fn base_score(&self) -> f64 {
        self.base_score
    }
}

impl Regressor for GradientBoostedRegressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        check_training_set(x, y)?;

        let n = x.nrows();
        let params = self.config.tree_params();
        let base_score = y.sum() / n as f64;
        let mut predictions = vec![base_score; n];
        let hessians = vec![1.0; n];
        let mut gradients = vec![0.0; n];
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for round in 0..self.config.n_estimators {
            for (i, g) in gradients.iter_mut().enumerate() {
                *g = predictions[i] - y[i];
            }

            let tree = RegressionTree::grow(x, &gradients, &hessians, &params);
            for (i, p) in predictions.iter_mut().enumerate() {
                *p += tree.predict_row(x.row(i));
            }
            trees.push(tree);

            if round % 50 == 0 {
                let mse = predictions
                    .iter()
                    .zip(y.iter())
                    .map(|(p, t)| (p - t).powi(2))
                    .sum::<f64>()
                    / n as f64;
                debug!(round, mse, "boosting progress");
            }
        }

        info!(
            rows = n,
            features = x.ncols(),
            trees = trees.len(),
            "fitted gradient-boosted regressor"
        );

        self.base_score = base_score;
        self.n_features = x.ncols();
        self.trees = trees;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }

        Ok(x
            .rows()
            .into_iter()
            .map(|row| {
                self.base_score
                    + self
                        .trees
                        .iter()
                        .map(|tree| tree.predict_row(row))
                        .sum::<f64>()
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = BoosterConfig::default();
        assert_eq!(config.n_estimators, 200);
        assert_relative_eq!(config.learning_rate, 0.1);
        assert_eq!(config.max_depth, 6);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(BoosterConfig { n_estimators: 0, ..Default::default() })]
    #[case(BoosterConfig { learning_rate: 0.0, ..Default::default() })]
    #[case(BoosterConfig { learning_rate: 1.5, ..Default::default() })]
    #[case(BoosterConfig { lambda: -1.0, ..Default::default() })]
    #[case(BoosterConfig { min_child_weight: f64::NAN, ..Default::default() })]
    fn test_invalid_config(#[case] config: BoosterConfig) {
        assert!(matches!(
            GradientBoostedRegressor::new(config),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_fits_linear_trend() {
        let x = Array2::from_shape_fn((40, 1), |(i, _)| i as f64);
        let y = Array1::from_shape_fn(40, |i| 2.0 * i as f64 + 3.0);

        let mut model = GradientBoostedRegressor::try_default().unwrap();
        model.fit(&x, &y).unwrap();
        let pred = model.predict(&x).unwrap();

        let mse = (&pred - &y).mapv(|e| e * e).mean().unwrap();
        assert!(mse < 1.0, "mse = {mse}");
        assert_eq!(model.trees().len(), 200);
    }

    #[test]
    fn test_constant_target() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![7.0, 7.0, 7.0];

        let mut model = GradientBoostedRegressor::try_default().unwrap();
        model.fit(&x, &y).unwrap();

        assert_relative_eq!(model.base_score(), 7.0);
        for p in model.predict(&x).unwrap().iter() {
            assert_relative_eq!(*p, 7.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let model = GradientBoostedRegressor::try_default().unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_feature_count_checked() {
        let mut model = GradientBoostedRegressor::try_default().unwrap();
        model.fit(&array![[1.0, 2.0], [2.0, 3.0]], &array![1.0, 2.0]).unwrap();
        assert!(matches!(
            model.predict(&array![[1.0]]),
            Err(ModelError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_empty_training_set() {
        let mut model = GradientBoostedRegressor::try_default().unwrap();
        let x = Array2::<f64>::zeros((0, 3));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(model.fit(&x, &y), Err(ModelError::EmptyTrainingSet)));
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_nan_target_rejected() {
        let mut model = GradientBoostedRegressor::try_default().unwrap();
        let result = model.fit(&array![[1.0], [2.0]], &array![1.0, f64::NAN]);
        assert!(matches!(result, Err(ModelError::NonFiniteTarget(1))));
    }
}
