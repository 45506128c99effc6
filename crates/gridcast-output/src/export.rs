//! Export functionality for Gridcast data.
//!
//! Predictions export as CSV, JSON or pretty JSON. The flattened fused
//! dataset exports as CSV with a header row, or as a JSON array of row
//! objects.

use gridcast_model::ScorePrediction;
use polars::prelude::{AnyValue, DataFrame};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::PrettyJson => "pretty-json",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "prettyjson" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn into_string(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

/// One predicted matchup, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionExport {
    /// Season year.
    pub season: i32,

    /// Predicted week.
    pub week: u32,

    /// Home team name.
    pub home_team: String,

    /// Away team name.
    pub away_team: String,

    /// Predicted home points.
    pub home_points: i32,

    /// Predicted away points.
    pub away_points: i32,

    /// Predicted home margin.
    pub margin: i32,
}

impl PredictionExport {
    /// Create an export row from a model prediction.
    pub fn new(season: i32, week: u32, prediction: &ScorePrediction) -> Self {
        Self {
            season,
            week,
            home_team: prediction.home_team.clone(),
            away_team: prediction.away_team.clone(),
            home_points: prediction.home_points,
            away_points: prediction.away_points,
            margin: prediction.margin(),
        }
    }

    /// Create export rows for a whole prediction set.
    pub fn from_predictions(
        season: i32,
        week: u32,
        predictions: &[ScorePrediction],
    ) -> Vec<Self> {
        predictions
            .iter()
            .map(|p| Self::new(season, week, p))
            .collect()
    }
}

impl Exporter for PredictionExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                wtr.serialize(self)?;
                into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<PredictionExport> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                if self.is_empty() {
                    wtr.write_record([
                        "season",
                        "week",
                        "home_team",
                        "away_team",
                        "home_points",
                        "away_points",
                        "margin",
                    ])?;
                }
                for record in self {
                    wtr.serialize(record)?;
                }
                into_string(wtr)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// The flattened fused dataset, one row per game.
#[derive(Debug, Clone, Copy)]
pub struct DatasetExport<'a> {
    frame: &'a DataFrame,
}

impl<'a> DatasetExport<'a> {
    /// Wrap a flattened game table.
    pub const fn new(frame: &'a DataFrame) -> Self {
        Self { frame }
    }

    /// Number of rows that will be written.
    pub fn rows(&self) -> usize {
        self.frame.height()
    }

    fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(self.column_names())?;

        let columns = self.frame.get_columns();
        for row in 0..self.frame.height() {
            let mut record = Vec::with_capacity(columns.len());
            for column in columns {
                record.push(cell_text(&column.get(row)?));
            }
            wtr.write_record(&record)?;
        }

        into_string(wtr)
    }

    fn to_rows(&self) -> Result<Vec<Value>, ExportError> {
        let names = self.column_names();
        let columns = self.frame.get_columns();

        (0..self.frame.height())
            .map(|row| -> Result<Value, ExportError> {
                let mut object = Map::with_capacity(columns.len());
                for (name, column) in names.iter().zip(columns) {
                    object.insert(name.clone(), cell_json(&column.get(row)?));
                }
                Ok(Value::Object(object))
            })
            .collect()
    }
}

impl Exporter for DatasetExport<'_> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Json => Ok(serde_json::to_string(&self.to_rows()?)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&self.to_rows()?)?),
        }
    }
}

/// Text form of a cell; nulls are empty.
fn cell_text(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => (*s).to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Float64(v) => v.to_string(),
        AnyValue::Boolean(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn cell_json(value: &AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(*v),
        AnyValue::Float64(v) => {
            serde_json::Number::from_f64(*v).map_or(Value::Null, Value::Number)
        }
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        other => Value::String(cell_text(other)),
    }
}
