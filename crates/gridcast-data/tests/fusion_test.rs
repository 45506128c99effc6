//! Integration tests for fusing CFBD-shaped payloads.

use gridcast_data::records::{FpiRating, SpRating, StandingsRecord, TeamRecord, VenueRecord};
use gridcast_data::store::{GameStore, SqliteGameStore};
use gridcast_data::{FusionError, Game, SupplementalData, fuse_season, normalize};
use serde_json::{Value, json};

fn games() -> Vec<Game> {
    serde_json::from_value(json!([
        {
            "id": 1, "season": 2024, "week": 5, "seasonType": "regular",
            "homeTeam": "Ohio State", "homeConference": "Big Ten", "homePoints": 20,
            "awayTeam": "Penn St.", "awayConference": "Big Ten", "awayPoints": 13,
            "venueId": 101
        },
        {
            "id": 2, "season": 2024, "week": 5, "seasonType": "regular",
            "homeTeam": "Texas A&M", "homeConference": "SEC", "homePoints": 41,
            "awayTeam": "Arkansas", "awayConference": "SEC", "awayPoints": 10,
            "venueId": 202
        },
        {
            "id": 3, "season": 2024, "week": 6, "seasonType": "regular",
            "homeTeam": "Montana", "homeConference": "Big Sky", "homePoints": null,
            "awayTeam": "Idaho", "awayConference": "Big Sky", "awayPoints": null,
            "venueId": null
        }
    ]))
    .unwrap()
}

fn supplemental() -> SupplementalData {
    let sp: Vec<SpRating> = serde_json::from_value(json!([
        { "year": 2024, "team": "Ohio State", "rating": 24.1, "offense": { "rating": 36.0 } },
        { "year": 2024, "team": "Texas A&M", "rating": 11.4 },
        { "year": 2024, "team": "Arkansas", "rating": 6.2 }
    ]))
    .unwrap();
    let fpi: Vec<FpiRating> = serde_json::from_value(json!([
        { "year": 2024, "team": "Ohio State", "fpi": 25.5 },
        { "year": 2024, "team": "Penn State", "fpi": 17.0 }
    ]))
    .unwrap();
    let teams: Vec<TeamRecord> = serde_json::from_value(json!([
        { "id": 194, "school": "Ohio State", "mascot": "Buckeyes" },
        { "id": 245, "school": "Texas A&M", "mascot": "Aggies" }
    ]))
    .unwrap();
    let records: Vec<StandingsRecord> = serde_json::from_value(json!([
        { "year": 2024, "team": "Arkansas", "expectedWins": 6.4, "total": { "wins": 7 } }
    ]))
    .unwrap();
    let venues: Vec<VenueRecord> = serde_json::from_value(json!([
        { "id": 101, "name": "Ohio Stadium", "capacity": 102780 }
    ]))
    .unwrap();

    SupplementalData {
        teams,
        sp_ratings: sp,
        fpi_ratings: fpi,
        season_stats: Vec::new(),
        records,
        venues,
    }
}

#[test]
fn test_fused_documents_match_expected_shape() {
    let outcome = fuse_season(games(), supplemental()).unwrap();
    let doc: Value = serde_json::to_value(&outcome.games[0]).unwrap();

    assert_eq!(doc["homeTeam"], json!("Ohio State"));
    assert_eq!(doc["ratings"]["sp"]["home"]["rating"], json!(24.1));
    assert_eq!(doc["ratings"]["sp"]["home"]["offense"]["rating"], json!(36.0));
    assert_eq!(doc["ratings"]["sp"]["away"], Value::Null);
    // "Penn St." does not normalize to "penn state": no alias table.
    assert_eq!(doc["ratings"]["fpi"]["away"], Value::Null);
    assert_eq!(doc["venue_info"]["name"], json!("Ohio Stadium"));
    assert_eq!(doc["fbs_only"], json!(true));
    assert_eq!(doc["season_stats"]["home"], Value::Null);
}

#[test]
fn test_coverage_counters_bounded_by_games() {
    let outcome = fuse_season(games(), supplemental()).unwrap();
    let coverage = outcome.coverage;

    assert_eq!(coverage.total_games, 3);
    assert_eq!(coverage.sp_matched, 2);
    assert_eq!(coverage.team_info_matched, 2);
    assert_eq!(coverage.season_stats_matched, 0);
    for count in [
        coverage.sp_matched,
        coverage.team_info_matched,
        coverage.season_stats_matched,
    ] {
        assert!(count <= coverage.total_games);
    }
}

#[test]
fn test_fbs_flag_tracks_sp_index() {
    let data = supplemental();
    let sp_keys: Vec<String> = data
        .sp_ratings
        .iter()
        .map(|r| normalize(r.team.as_deref()))
        .collect();

    let outcome = fuse_season(games(), data).unwrap();
    for record in &outcome.games {
        let home = normalize(record.game.home_team.as_deref());
        let away = normalize(record.game.away_team.as_deref());
        let expected = sp_keys.contains(&home) || sp_keys.contains(&away);
        assert_eq!(record.fbs_only, expected);
    }
}

#[test]
fn test_empty_primary_list_is_fatal() {
    let result = fuse_season(Vec::new(), supplemental());
    assert!(matches!(result, Err(FusionError::NoGames)));
}

#[test]
fn test_persisted_batch_round_trips() {
    let outcome = fuse_season(games(), supplemental()).unwrap();
    let mut store = SqliteGameStore::in_memory().unwrap();

    store.replace_season(2024, &outcome.games).unwrap();
    let loaded = store.load_season(2024).unwrap();

    assert_eq!(loaded, outcome.games);
    assert_eq!(
        loaded[1]
            .records
            .away
            .as_ref()
            .and_then(|r| r.expected_wins.as_ref())
            .and_then(|v| v.as_f64()),
        Some(6.4)
    );
}
