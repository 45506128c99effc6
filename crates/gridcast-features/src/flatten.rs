//! Flatten fused games into a table.
//!
//! Nested slots are lifted into prefixed snake_case columns:
//!
//! | nested path                         | column                      |
//! |-------------------------------------|-----------------------------|
//! | `homeTeam`                          | `home_team`                 |
//! | `ratings.sp.home.rating`            | `home_sp_rating`            |
//! | `ratings.fpi.away.efficiencies.overall` | `away_fpi_efficiencies_overall` |
//! | `team_info.home.mascot`             | `home_team_info_mascot`     |
//! | `season_stats.away.statValue`       | `away_season_stats_stat_value` |
//! | `records.home.total.wins`           | `home_records_total_wins`   |
//! | `venue_info.capacity`               | `venue_capacity`            |
//!
//! Column dtype is Float64 when every present value is a number, Boolean when
//! every present value is a bool and String otherwise. Columns with no
//! present value at all are String. Arrays are kept as JSON text.

use crate::error::{FeatureError, Result};
use gridcast_data::GameRecord;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Nested slots and the prefix their columns get.
const SIDE_CATEGORIES: [(&str, &str); 3] = [
    ("team_info", "team_info"),
    ("season_stats", "season_stats"),
    ("records", "records"),
];

/// Rating sources under `ratings`.
const RATING_SOURCES: [&str; 2] = ["sp", "fpi"];

/// Sides of a pair.
const SIDES: [&str; 2] = ["home", "away"];

/// Accumulates sparse rows into columns, keeping first-seen column order.
#[derive(Debug, Default)]
struct ColumnBuilder {
    order: Vec<String>,
    positions: HashMap<String, usize>,
    values: Vec<Vec<Option<Value>>>,
    rows: usize,
}

impl ColumnBuilder {
    fn push_row(&mut self, row: Vec<(String, Value)>) {
        for (name, value) in row {
            let idx = match self.positions.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = self.order.len();
                    self.positions.insert(name.clone(), idx);
                    self.order.push(name);
                    self.values.push(vec![None; self.rows]);
                    idx
                }
            };
            let column = &mut self.values[idx];
            // The same column can only appear once per row; keep the latest.
            if column.len() > self.rows {
                column.pop();
            }
            column.push(if value.is_null() { None } else { Some(value) });
        }

        self.rows += 1;
        for column in &mut self.values {
            if column.len() < self.rows {
                column.push(None);
            }
        }
    }

    fn finish(self) -> Result<DataFrame> {
        let columns = self
            .order
            .into_iter()
            .zip(self.values)
            .map(|(name, values)| typed_column(&name, values))
            .collect::<Vec<_>>();

        Ok(DataFrame::new(columns)?)
    }
}

/// Build a typed column from JSON values.
fn typed_column(name: &str, values: Vec<Option<Value>>) -> Column {
    let present = values.iter().flatten().count();
    let all_numbers = present > 0 && values.iter().flatten().all(Value::is_number);
    let all_bools = present > 0 && values.iter().flatten().all(Value::is_boolean);

    if all_numbers {
        let data: Vec<Option<f64>> = values
            .iter()
            .map(|v| v.as_ref().and_then(Value::as_f64))
            .collect();
        Column::new(name.into(), data)
    } else if all_bools {
        let data: Vec<Option<bool>> = values
            .iter()
            .map(|v| v.as_ref().and_then(Value::as_bool))
            .collect();
        Column::new(name.into(), data)
    } else {
        let data: Vec<Option<String>> = values
            .into_iter()
            .map(|v| {
                v.map(|v| match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
            })
            .collect();
        Column::new(name.into(), data)
    }
}

/// Convert a camelCase key to snake_case.
pub fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Flatten `value` under `prefix`, appending `(column, scalar)` pairs.
fn flatten_value(prefix: &str, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => flatten_object(Some(prefix), map, out),
        Value::Array(_) => {
            out.push((prefix.to_string(), Value::String(value.to_string())))
        }
        scalar => out.push((prefix.to_string(), scalar.clone())),
    }
}

fn flatten_object(
    prefix: Option<&str>,
    map: &Map<String, Value>,
    out: &mut Vec<(String, Value)>,
) {
    for (key, value) in map {
        let key = snake_case(key);
        let name = match prefix {
            Some(prefix) => format!("{}_{}", prefix, key),
            None => key,
        };
        flatten_value(&name, value, out);
    }
}

/// Flatten a side pair (`{home, away}`) under `<side>_<label>`.
fn flatten_pair(label: &str, pair: Option<&Value>, out: &mut Vec<(String, Value)>) {
    let Some(pair) = pair else { return };
    for side in SIDES {
        if let Some(entry) = pair.get(side).filter(|v| !v.is_null()) {
            flatten_value(&format!("{}_{}", side, label), entry, out);
        }
    }
}

/// Flatten one fused game into `(column, value)` pairs.
pub fn flatten_record(record: &GameRecord) -> Result<Vec<(String, Value)>> {
    let Value::Object(mut doc) = serde_json::to_value(record)? else {
        return Err(FeatureError::EmptyDataset(
            "fused record did not serialize to an object".to_string(),
        ));
    };

    let mut row = Vec::new();

    let ratings = doc.remove("ratings");
    let pairs: Vec<(&str, Option<Value>)> = SIDE_CATEGORIES
        .iter()
        .map(|(key, label)| (*label, doc.remove(*key)))
        .collect();
    let venue = doc.remove("venue_info");

    flatten_object(None, &doc, &mut row);

    if let Some(ratings) = ratings {
        for source in RATING_SOURCES {
            flatten_pair(source, ratings.get(source), &mut row);
        }
    }
    for (label, pair) in &pairs {
        flatten_pair(label, pair.as_ref(), &mut row);
    }
    if let Some(venue) = venue.filter(|v| !v.is_null()) {
        flatten_value("venue", &venue, &mut row);
    }

    Ok(row)
}

/// Flatten fused games into a `DataFrame`, one row per game.
///
/// # Errors
/// Returns [`FeatureError::EmptyDataset`] if `records` is empty.
pub fn flatten_records(records: &[GameRecord]) -> Result<DataFrame> {
    if records.is_empty() {
        return Err(FeatureError::EmptyDataset(
            "no fused games to flatten".to_string(),
        ));
    }

    let mut builder = ColumnBuilder::default();
    for record in records {
        builder.push_row(flatten_record(record)?);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcast_data::records::{SpRating, VenueRecord};
    use gridcast_data::{Game, SupplementalData, fuse_season};
    use rstest::rstest;
    use serde_json::json;

    fn fused() -> Vec<GameRecord> {
        let mut rating = SpRating::new("Ohio State", 24.1);
        rating
            .extra
            .insert("offense".to_string(), json!({ "rating": 36.0, "ranking": 4 }));

        let data = SupplementalData {
            sp_ratings: vec![rating, SpRating::new("Michigan", 9.5)],
            venues: vec![VenueRecord::new(101, "Ohio Stadium")],
            ..Default::default()
        };
        let games = vec![
            Game::new(2024, 5, "Ohio State", "Penn St.")
                .with_venue(101)
                .with_points(20, 13),
            Game::new(2024, 6, "Michigan", "Ohio State")
                .with_conferences("Big Ten", "Big Ten"),
        ];
        fuse_season(games, data).unwrap().games
    }

    #[rstest]
    #[case("homeTeam", "home_team")]
    #[case("seasonType", "season_type")]
    #[case("statValue", "stat_value")]
    #[case("fbs_only", "fbs_only")]
    #[case("rating", "rating")]
    fn test_snake_case(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(snake_case(key), expected);
    }

    #[test]
    fn test_prefixed_rating_columns() {
        let df = flatten_records(&fused()).unwrap();

        assert_eq!(df.height(), 2);
        let home = df.column("home_sp_rating").unwrap();
        assert_eq!(home.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = home
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(24.1), Some(9.5)]);

        assert!(df.column("home_sp_offense_rating").is_ok());
        assert!(df.column("away_sp_rating").is_ok());
        assert!(df.column("venue_name").is_ok());
    }

    #[test]
    fn test_top_level_columns() {
        let df = flatten_records(&fused()).unwrap();

        assert_eq!(df.column("week").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("home_team").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("fbs_only").unwrap().dtype(), &DataType::Boolean);
        // No conference was set on the first game and no score on the second.
        assert_eq!(df.column("home_conference").unwrap().null_count(), 1);
        assert_eq!(df.column("home_points").unwrap().null_count(), 1);
    }

    #[test]
    fn test_all_null_column_is_not_numeric() {
        let df = flatten_records(&fused()).unwrap();
        assert_eq!(df.column("season_type").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            flatten_records(&[]),
            Err(FeatureError::EmptyDataset(_))
        ));
    }
}
