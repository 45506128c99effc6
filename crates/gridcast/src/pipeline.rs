//! End-to-end prediction pipeline.
//!
//! Fused games are flattened, rating columns selected and imputed, the table
//! split at the training cutoff, and two boosted regressors fitted on the
//! training weeks. The models then score every target-conference game of the
//! following week.

use crate::config::{ConfigError, RunConfig};
use gridcast_data::{DataError, GameRecord};
use gridcast_features::{
    FeatureError, FeatureSelector, ImputationScope, SplitStrategy, columns, flatten_records,
    string_column, to_matrix, to_vector,
};
use gridcast_model::{DualRegressor, ModelError, ScorePrediction};
use gridcast_output::{CoverageSummary, ExportError, PredictionReport};
use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from any stage of a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Acquisition, fusion or storage failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Flattening, selection or splitting failed
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// Model fitting or prediction failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Writing output failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration is incomplete or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of a prediction run.
#[derive(Debug, Clone)]
pub struct PredictionRun {
    /// Season year
    pub season: i32,
    /// Predicted week
    pub week: u32,
    /// Target conference
    pub conference: String,
    /// Rows the models were trained on
    pub training_rows: usize,
    /// Feature columns used, in matrix order
    pub feature_columns: Vec<String>,
    /// Rows covered by the imputation means
    pub imputation_scope: ImputationScope,
    /// One prediction per matchup in the prediction window
    pub predictions: Vec<ScorePrediction>,
}

impl PredictionRun {
    /// Build a printable report, optionally with fusion coverage.
    pub fn into_report(self, coverage: Option<CoverageSummary>) -> PredictionReport {
        let report = PredictionReport::new(
            self.season,
            self.week,
            &self.conference,
            self.training_rows,
            self.predictions,
        );
        match coverage {
            Some(coverage) => report.with_coverage(coverage),
            None => report,
        }
    }
}

/// Flatten fused games for export.
///
/// # Errors
/// Returns an error if there are no games.
pub fn fused_frame(records: &[GameRecord]) -> Result<DataFrame, PipelineError> {
    Ok(flatten_records(records)?)
}

/// Train on the weeks up to the cutoff and predict the week after it.
///
/// An empty prediction window yields a run with no predictions.
///
/// # Errors
/// Fails if there are no games, no rating features, no training rows, or a
/// model cannot be fitted.
pub fn predict_scores(
    records: &[GameRecord],
    config: &RunConfig,
) -> Result<PredictionRun, PipelineError> {
    let frame = flatten_records(records)?;
    let prepared = FeatureSelector::default().prepare(&frame)?;

    let strategy = SplitStrategy::with_config(config.split.clone());
    let split = strategy.split(&prepared.frame)?;

    let mut run = PredictionRun {
        season: config.season,
        week: split.week,
        conference: config.split.target_conference.clone(),
        training_rows: split.train.height(),
        feature_columns: prepared.feature_columns.clone(),
        imputation_scope: prepared.imputation_scope,
        predictions: Vec::new(),
    };

    if split.train.height() == 0 {
        return Err(ModelError::EmptyTrainingSet.into());
    }
    if split.predict.height() == 0 {
        warn!(
            week = run.week,
            conference = %run.conference,
            "no games in the prediction window"
        );
        return Ok(run);
    }

    let x_train = to_matrix(&split.train, &prepared.feature_columns)?;
    let home_points = to_vector(&split.train, columns::HOME_POINTS)?;
    let away_points = to_vector(&split.train, columns::AWAY_POINTS)?;

    let mut model = DualRegressor::boosted(config.booster.clone())?;
    model.fit(&x_train, &home_points, &away_points)?;

    let x_predict = to_matrix(&split.predict, &prepared.feature_columns)?;
    let home_teams = team_names(&split.predict, columns::HOME_TEAM)?;
    let away_teams = team_names(&split.predict, columns::AWAY_TEAM)?;

    run.predictions = model.predict_matchups(&x_predict, &home_teams, &away_teams)?;
    info!(
        predictions = run.predictions.len(),
        week = run.week,
        conference = %run.conference,
        "predicted scores"
    );

    Ok(run)
}

fn team_names(frame: &DataFrame, column: &str) -> Result<Vec<String>, FeatureError> {
    Ok(string_column(frame, column)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
