//! Report generation for a prediction run.

use crate::export::{ExportError, ExportFormat, Exporter, PredictionExport};
use crate::summary::CoverageSummary;
use chrono::{DateTime, Utc};
use gridcast_model::ScorePrediction;
use serde::{Deserialize, Serialize};

/// Predicted scores for one week of one conference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Season year.
    pub season: i32,

    /// Predicted week.
    pub week: u32,

    /// Conference the predictions were filtered to.
    pub conference: String,

    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Rows the models were trained on.
    pub training_rows: usize,

    /// Fusion coverage of the season, when known.
    pub coverage: Option<CoverageSummary>,

    /// Predicted matchups.
    pub predictions: Vec<ScorePrediction>,
}

impl PredictionReport {
    /// Create a new report.
    pub fn new(
        season: i32,
        week: u32,
        conference: &str,
        training_rows: usize,
        predictions: Vec<ScorePrediction>,
    ) -> Self {
        Self {
            season,
            week,
            conference: conference.to_string(),
            generated_at: Utc::now(),
            training_rows,
            coverage: None,
            predictions,
        }
    }

    /// Attach fusion coverage.
    pub const fn with_coverage(mut self, coverage: CoverageSummary) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Rows for the prediction exporters.
    pub fn export_rows(&self) -> Vec<PredictionExport> {
        PredictionExport::from_predictions(self.season, self.week, &self.predictions)
    }

    /// Render as an ASCII table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\nPredictions: {} {} week {}\n",
            self.season, self.conference, self.week
        ));
        output.push_str(&format!("Trained on {} games\n", self.training_rows));
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:<24} {:>6} {:>6} {:>8}\n",
            "Home", "Away", "Home", "Away", "Margin"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        if self.predictions.is_empty() {
            output.push_str("No games in the prediction window\n");
        }
        for p in &self.predictions {
            output.push_str(&format!(
                "{:<24} {:<24} {:>6} {:>6} {:>+8}\n",
                p.home_team,
                p.away_team,
                p.home_points,
                p.away_points,
                p.margin()
            ));
        }

        output.push_str(&"=".repeat(72));
        output.push('\n');

        if let Some(coverage) = &self.coverage {
            output.push_str(&format!("Coverage: {}\n", coverage));
        }

        output
    }

    /// Render as Markdown.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "# Predictions: {} {} week {}\n\n",
            self.season, self.conference, self.week
        ));
        output.push_str(&format!("**Training games:** {}\n\n", self.training_rows));

        output.push_str("| Home | Away | Home Pts | Away Pts | Margin |\n");
        output.push_str("|------|------|----------|----------|--------|\n");
        for p in &self.predictions {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {:+} |\n",
                p.home_team,
                p.away_team,
                p.home_points,
                p.away_points,
                p.margin()
            ));
        }

        if let Some(coverage) = &self.coverage {
            output.push_str("\n## Coverage\n\n");
            output.push_str(&format!(
                "- **SP+:** {} ({:.1}%)\n",
                coverage.sp_matched,
                coverage.sp_pct()
            ));
            output.push_str(&format!(
                "- **Team info:** {} ({:.1}%)\n",
                coverage.team_info_matched,
                coverage.team_info_pct()
            ));
            output.push_str(&format!(
                "- **Season stats:** {} ({:.1}%)\n",
                coverage.season_stats_matched,
                coverage.season_stats_pct()
            ));
        }

        output
    }
}

impl Exporter for PredictionReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => self.export_rows().export_to_string(format),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
