//! Integration tests for exporting a fused season and its predictions.

use gridcast_data::{Game, SupplementalData, fuse_season, records::SpRating};
use gridcast_model::ScorePrediction;
use gridcast_output::{
    CoverageSummary, DatasetExport, ExportFormat, Exporter, PredictionExport, PredictionReport,
};
use polars::prelude::*;

#[test]
fn test_coverage_from_fusion() {
    let data = SupplementalData {
        sp_ratings: vec![SpRating::new("Georgia", 22.0)],
        ..Default::default()
    };
    let games = vec![
        Game::new(2024, 1, "Georgia", "Clemson"),
        Game::new(2024, 1, "Rice", "Tulane"),
    ];
    let outcome = fuse_season(games, data).unwrap();

    let coverage = CoverageSummary::from(&outcome.coverage);
    assert_eq!(coverage.total_games, 2);
    assert_eq!(coverage.sp_matched, 1);
    assert!((coverage.sp_pct() - 50.0).abs() < 1e-10);
}

#[test]
fn test_prediction_files_roundtrip() {
    let dir = std::env::temp_dir().join(format!("gridcast-output-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();

    let predictions = vec![
        ScorePrediction {
            home_team: "Texas A&M".to_string(),
            away_team: "Texas".to_string(),
            home_points: 24,
            away_points: 28,
        },
        ScorePrediction {
            home_team: "Louisville".to_string(),
            away_team: "Kentucky".to_string(),
            home_points: 31,
            away_points: 20,
        },
    ];
    let report = PredictionReport::new(2024, 14, "SEC", 700, predictions);

    let csv_path = dir.join("predictions.csv");
    report.export_to_file(&csv_path, ExportFormat::Csv).unwrap();
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<PredictionExport> = reader.deserialize().map(Result::unwrap).collect();
    assert_eq!(rows, report.export_rows());

    let json_path = dir.join("predictions.json");
    report
        .export_rows()
        .export_to_file(&json_path, ExportFormat::PrettyJson)
        .unwrap();
    let text = std::fs::read_to_string(&json_path).unwrap();
    let parsed: Vec<PredictionExport> = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0].margin, -4);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_dataset_csv_shape() {
    let frame = df!(
        "week" => [1.0, 2.0, 3.0],
        "home_team" => ["A", "B", "C"],
        "venue_name" => [Some("Ohio Stadium"), None, Some("Kyle Field")],
    )
    .unwrap();

    let export = DatasetExport::new(&frame);
    assert_eq!(export.rows(), 3);

    let csv = export.export_to_string(ExportFormat::Csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "2,B,");
}
