//! Temporal train/predict split.
//!
//! Training rows are every game up to and including the cutoff week. The
//! prediction window is the single week after the cutoff, restricted to games
//! where either side plays in the target conference. The two sets never
//! overlap since they cover disjoint weeks.

use crate::columns;
use crate::error::{FeatureError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for the SplitStrategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Last training week, inclusive (default: 13)
    pub training_cutoff: u32,
    /// Conference whose games are predicted (default: "SEC")
    pub target_conference: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            training_cutoff: 13,
            target_conference: "SEC".to_string(),
        }
    }
}

impl SplitConfig {
    /// The week that is predicted.
    ///
    /// # Errors
    /// Returns [`FeatureError::InvalidConfig`] if no week follows the cutoff.
    pub fn prediction_week(&self) -> Result<u32> {
        self.training_cutoff.checked_add(1).ok_or_else(|| {
            FeatureError::InvalidConfig(format!(
                "training_cutoff {} leaves no week to predict",
                self.training_cutoff
            ))
        })
    }

    /// Check that the configuration describes a usable split.
    ///
    /// # Errors
    /// Returns [`FeatureError::InvalidConfig`] for an out-of-range cutoff.
    pub fn validate(&self) -> Result<()> {
        self.prediction_week().map(|_| ())
    }
}

/// Training and prediction rows.
#[derive(Debug, Clone)]
pub struct Split {
    /// Rows with `week <= cutoff`
    pub train: DataFrame,
    /// Rows in the prediction week involving the target conference
    pub predict: DataFrame,
    /// The predicted week
    pub week: u32,
}

/// Partitions a game table by week and conference
#[derive(Debug, Default)]
pub struct SplitStrategy {
    config: SplitConfig,
}

impl SplitStrategy {
    /// Create a split strategy with the given configuration.
    pub const fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Filter expression for training rows.
    pub fn training_filter(&self) -> Expr {
        week().lt_eq(lit(self.config.training_cutoff as f64))
    }

    /// Filter expression for prediction rows.
    ///
    /// # Errors
    /// Returns [`FeatureError::InvalidConfig`] if no week follows the cutoff.
    pub fn prediction_filter(&self) -> Result<Expr> {
        let conference = self.config.target_conference.as_str();
        let home = col(columns::HOME_CONFERENCE)
            .eq(lit(conference))
            .fill_null(lit(false));
        let away = col(columns::AWAY_CONFERENCE)
            .eq(lit(conference))
            .fill_null(lit(false));

        let predicted = self.config.prediction_week()?;
        Ok(week().eq(lit(predicted as f64)).and(home.or(away)))
    }

    /// Split a game table.
    ///
    /// # Errors
    /// Returns [`FeatureError::MissingColumn`] if the week or conference
    /// columns are absent, or [`FeatureError::InvalidConfig`] if no week
    /// follows the cutoff.
    pub fn split(&self, df: &DataFrame) -> Result<Split> {
        let predicted_week = self.config.prediction_week()?;
        for name in [
            columns::WEEK,
            columns::HOME_CONFERENCE,
            columns::AWAY_CONFERENCE,
        ] {
            if df.column(name).is_err() {
                return Err(FeatureError::MissingColumn(name.to_string()));
            }
        }

        let train = df.clone().lazy().filter(self.training_filter()).collect()?;
        let predict = df
            .clone()
            .lazy()
            .filter(self.prediction_filter()?)
            .collect()?;

        info!(
            train = train.height(),
            predict = predict.height(),
            cutoff = self.config.training_cutoff,
            conference = %self.config.target_conference,
            "split games"
        );

        Ok(Split {
            train,
            predict,
            week: predicted_week,
        })
    }
}

fn week() -> Expr {
    col(columns::WEEK).cast(DataType::Float64)
}
