//! Feature selection and mean imputation.
//!
//! Features are the numeric columns whose name carries a side-and-source
//! marker (`_sp_`, `_fpi_`), e.g. `home_sp_rating` or `away_fpi_fpi`.
//!
//! Missing values are filled with the column mean over every row handed to
//! [`FeatureSelector::prepare`]. When that frame also holds the prediction
//! week, the means include rows the models will later predict on, so
//! prediction-window statistics leak into the training features. This is the
//! established behaviour of the pipeline and is kept; [`PreparedFeatures`]
//! records how many rows the means were taken over and a warning is logged.

use crate::columns;
use crate::error::{FeatureError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration for the FeatureSelector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Substrings that mark a rating column (default: `_sp_`, `_fpi_`)
    pub markers: Vec<String>,
    /// Score targets, imputed the same way as features
    pub targets: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            markers: vec!["_sp_".to_string(), "_fpi_".to_string()],
            targets: vec![
                columns::HOME_POINTS.to_string(),
                columns::AWAY_POINTS.to_string(),
            ],
        }
    }
}

/// Which rows the imputation means were computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputationScope {
    /// Training and prediction rows together
    WholeDataset,
}

/// Features ready for splitting and training.
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    /// Full frame with feature and target columns imputed
    pub frame: DataFrame,
    /// Selected feature columns, in frame order
    pub feature_columns: Vec<String>,
    /// Target columns
    pub target_columns: Vec<String>,
    /// Rows the imputation means cover
    pub imputation_scope: ImputationScope,
    /// Number of rows the imputation means were computed over
    pub imputation_rows: usize,
}

/// Selects rating columns and imputes missing values
#[derive(Debug, Default)]
pub struct FeatureSelector {
    config: SelectorConfig,
}

impl FeatureSelector {
    /// Create a selector with the given configuration.
    pub const fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// Names of numeric columns carrying a rating marker.
    pub fn feature_columns(&self, df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|c| c.dtype().is_primitive_numeric())
            .map(|c| c.name().to_string())
            .filter(|name| self.config.markers.iter().any(|m| name.contains(m.as_str())))
            .collect()
    }

    /// Select features and impute features and targets with whole-frame means.
    ///
    /// # Errors
    /// Returns an error if the frame is empty, a target column is missing or
    /// no feature column matches.
    pub fn prepare(&self, df: &DataFrame) -> Result<PreparedFeatures> {
        if df.height() == 0 {
            return Err(FeatureError::EmptyDataset(
                "no rows to select features from".to_string(),
            ));
        }

        for target in &self.config.targets {
            if df.column(target).is_err() {
                return Err(FeatureError::MissingColumn(target.clone()));
            }
        }

        let feature_columns = self.feature_columns(df);
        if feature_columns.is_empty() {
            return Err(FeatureError::NoFeatures(self.config.markers.clone()));
        }

        let imputations: Vec<Expr> = feature_columns
            .iter()
            .chain(self.config.targets.iter())
            .map(|name| {
                let values = col(name.as_str()).cast(DataType::Float64);
                values.clone().fill_null(values.mean()).alias(name.as_str())
            })
            .collect();

        let frame = df.clone().lazy().with_columns(imputations).collect()?;

        warn!(
            rows = frame.height(),
            "mean imputation uses every row, including the prediction window"
        );
        info!(
            "Selected {} feature columns from {} rows",
            feature_columns.len(),
            frame.height()
        );

        Ok(PreparedFeatures {
            imputation_scope: ImputationScope::WholeDataset,
            imputation_rows: frame.height(),
            frame,
            feature_columns,
            target_columns: self.config.targets.clone(),
        })
    }
}
