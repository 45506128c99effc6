//! Fusion engine
//!
//! Attaches matched supplemental entries to every game of a season in a
//! single linear pass. Lookups that miss leave the slot absent and are logged
//! at debug level; they never fail the run. The only fatal condition is an
//! empty primary game list, which aborts before any index is built.
//!
//! Coverage counters count games, not sides: a game where both teams match a
//! dataset increments that dataset's counter once.

use crate::index::{Indexes, SupplementalData};
use crate::normalize::normalize;
use crate::records::{Game, GameRecord, Ratings, SidePair, TeamRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that abort a fusion run
#[derive(Debug, Error)]
pub enum FusionError {
    /// The primary game list was empty or unavailable
    #[error("No games fetched. Aborting.")]
    NoGames,
}

/// Run-scoped count of games that received at least one match per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCounters {
    /// Games processed
    pub total_games: usize,
    /// Games with an SP+ rating on at least one side
    pub sp_matched: usize,
    /// Games with FBS team info on at least one side
    pub team_info_matched: usize,
    /// Games with season stats on at least one side
    pub season_stats_matched: usize,
}

impl CoverageCounters {
    /// Count one game.
    pub const fn record(&mut self, sp: bool, team_info: bool, season_stats: bool) {
        self.total_games += 1;
        if sp {
            self.sp_matched += 1;
        }
        if team_info {
            self.team_info_matched += 1;
        }
        if season_stats {
            self.season_stats_matched += 1;
        }
    }

    /// Recount coverage from already fused records, e.g. after loading them
    /// back from a store.
    pub fn from_records(records: &[GameRecord]) -> Self {
        let mut coverage = Self::default();
        for record in records {
            coverage.record(
                record.ratings.sp.any_matched(),
                record.team_info.any_matched(),
                record.season_stats.any_matched(),
            );
        }
        coverage
    }
}

/// Fused records and the coverage they achieved.
#[derive(Debug, Clone)]
pub struct FusionOutcome {
    /// Fused games, in input order
    pub games: Vec<GameRecord>,
    /// Coverage counters for the run
    pub coverage: CoverageCounters,
}

/// Merges games with prebuilt supplemental indexes.
#[derive(Debug, Default)]
pub struct FusionEngine {
    indexes: Indexes,
}

impl FusionEngine {
    /// Create an engine over fully built indexes.
    pub const fn new(indexes: Indexes) -> Self {
        Self { indexes }
    }

    /// The indexes the engine looks up against.
    pub const fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    /// Fuse every game.
    ///
    /// # Errors
    /// Returns [`FusionError::NoGames`] if `games` is empty.
    pub fn fuse(&self, games: Vec<Game>) -> Result<FusionOutcome, FusionError> {
        ensure_games(&games)?;

        let mut coverage = CoverageCounters::default();
        let games: Vec<GameRecord> = games
            .into_iter()
            .map(|game| self.fuse_game(game, &mut coverage))
            .collect();

        info!("SP ratings merged for {} games", coverage.sp_matched);
        info!("Team info merged for {} games", coverage.team_info_matched);
        info!(
            "Season stats merged for {} games",
            coverage.season_stats_matched
        );

        Ok(FusionOutcome { games, coverage })
    }

    /// Fuse one game and count its coverage.
    pub fn fuse_game(&self, game: Game, coverage: &mut CoverageCounters) -> GameRecord {
        let home_key = normalize(game.home_team.as_deref());
        let away_key = normalize(game.away_team.as_deref());
        let idx = &self.indexes;

        let ratings = Ratings {
            sp: SidePair::new(
                idx.sp.get(&home_key).cloned(),
                idx.sp.get(&away_key).cloned(),
            ),
            fpi: SidePair::new(
                idx.fpi.get(&home_key).cloned(),
                idx.fpi.get(&away_key).cloned(),
            ),
        };
        let team_info = SidePair::new(
            idx.teams.get(&home_key).cloned(),
            idx.teams.get(&away_key).cloned(),
        );
        let season_stats = SidePair::new(
            idx.season_stats.get(&home_key).cloned(),
            idx.season_stats.get(&away_key).cloned(),
        );
        let records = SidePair::new(
            idx.records.get(&home_key).cloned(),
            idx.records.get(&away_key).cloned(),
        );
        let venue_info = game
            .venue_id
            .and_then(|id| idx.venues.get(id))
            .cloned();

        let fbs_only = ratings.sp.any_matched();
        coverage.record(
            fbs_only,
            team_info.any_matched(),
            season_stats.any_matched(),
        );

        log_unmatched(&game, &ratings, &team_info);
        if venue_info.is_none()
            && let Some(venue_id) = game.venue_id
        {
            debug!("No venue info for venue id: {}", venue_id);
        }

        GameRecord {
            game,
            ratings,
            team_info,
            season_stats,
            records,
            venue_info,
            fbs_only,
        }
    }
}

/// Abort on an empty primary game list.
///
/// # Errors
/// Returns [`FusionError::NoGames`] if `games` is empty.
pub fn ensure_games(games: &[Game]) -> Result<(), FusionError> {
    if games.is_empty() {
        error!("No games fetched. Aborting.");
        return Err(FusionError::NoGames);
    }
    Ok(())
}

/// Build indexes from `data` and fuse `games`.
///
/// # Errors
/// Returns [`FusionError::NoGames`] if `games` is empty.
pub fn fuse_season(
    games: Vec<Game>,
    data: SupplementalData,
) -> Result<FusionOutcome, FusionError> {
    fuse_with(games, || data)
}

/// Like [`fuse_season`], loading supplemental data only once the game list
/// is known to be non-empty.
///
/// # Errors
/// Returns [`FusionError::NoGames`] if `games` is empty; `load` is not called.
pub fn fuse_with<F>(games: Vec<Game>, load: F) -> Result<FusionOutcome, FusionError>
where
    F: FnOnce() -> SupplementalData,
{
    ensure_games(&games)?;
    let engine = FusionEngine::new(Indexes::build(load()));
    engine.fuse(games)
}

fn log_unmatched(game: &Game, ratings: &Ratings, team_info: &SidePair<TeamRecord>) {
    let home = game.home_team.as_deref().unwrap_or_default();
    let away = game.away_team.as_deref().unwrap_or_default();

    if ratings.sp.home.is_none() {
        debug!("No SP rating for home team: {}", home);
    }
    if ratings.sp.away.is_none() {
        debug!("No SP rating for away team: {}", away);
    }
    if team_info.home.is_none() {
        debug!("No FBS team info for home team: {}", home);
    }
    if team_info.away.is_none() {
        debug!("No FBS team info for away team: {}", away);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{SeasonStatRecord, SpRating, VenueRecord};
    use approx::assert_relative_eq;
    use serde_json::Map;

    fn team(school: &str) -> TeamRecord {
        TeamRecord {
            id: None,
            school: Some(school.to_string()),
            mascot: None,
            abbreviation: None,
            conference: None,
            extra: Map::new(),
        }
    }

    fn stat(team: &str, value: f64) -> SeasonStatRecord {
        SeasonStatRecord {
            season: Some(2024),
            team: Some(team.to_string()),
            conference: None,
            stat_name: Some("totalYards".to_string()),
            stat_value: Some(value.into()),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_recount_matches_fusion() {
        let games = vec![
            Game::new(2024, 1, "Ohio State", "Michigan"),
            Game::new(2024, 1, "Rice", "Tulane"),
        ];
        let data = SupplementalData {
            sp_ratings: vec![
                SpRating::new("Ohio State", 24.1),
                SpRating::new("Michigan", 9.5),
            ],
            teams: vec![team("Tulane")],
            ..Default::default()
        };

        let outcome = fuse_season(games, data).unwrap();
        assert_eq!(CoverageCounters::from_records(&outcome.games), outcome.coverage);
    }

    #[test]
    fn test_single_side_sp_match() {
        let game = Game::new(2024, 5, "Ohio State", "Penn St.").with_venue(101);
        let data = SupplementalData {
            sp_ratings: vec![SpRating::new("Ohio State", 24.1)],
            venues: vec![VenueRecord::new(101, "Ohio Stadium")],
            ..Default::default()
        };

        let outcome = fuse_season(vec![game], data).unwrap();
        let record = &outcome.games[0];

        let home = record.ratings.sp.home.as_ref().unwrap();
        assert_relative_eq!(home.rating.unwrap(), 24.1);
        assert!(record.ratings.sp.away.is_none());
        assert!(record.fbs_only);
        assert_eq!(
            record.venue_info.as_ref().and_then(|v| v.name.as_deref()),
            Some("Ohio Stadium")
        );
        assert_eq!(outcome.coverage.sp_matched, 1);
    }

    #[test]
    fn test_both_sides_count_once() {
        let games = vec![
            Game::new(2024, 1, "Texas", "Michigan"),
            Game::new(2024, 1, "Idaho", "Montana"),
        ];
        let data = SupplementalData {
            sp_ratings: vec![SpRating::new("Texas", 20.0), SpRating::new("Michigan", 15.0)],
            teams: vec![team("Texas"), team("Michigan")],
            season_stats: vec![stat("Montana", 4100.0)],
            ..Default::default()
        };

        let outcome = fuse_season(games, data).unwrap();

        assert_eq!(outcome.coverage.total_games, 2);
        assert_eq!(outcome.coverage.sp_matched, 1);
        assert_eq!(outcome.coverage.team_info_matched, 1);
        assert_eq!(outcome.coverage.season_stats_matched, 1);
        assert!(outcome.games[0].ratings.sp.both_matched());
        assert!(!outcome.games[1].fbs_only);
    }

    #[test]
    fn test_empty_sp_dataset() {
        let games = vec![
            Game::new(2024, 2, "Alabama", "Georgia"),
            Game::new(2024, 2, "LSU", "Ole Miss"),
        ];
        let data = SupplementalData {
            teams: vec![team("Alabama")],
            ..Default::default()
        };

        let outcome = fuse_season(games, data).unwrap();

        assert_eq!(outcome.coverage.sp_matched, 0);
        for record in &outcome.games {
            assert!(record.ratings.sp.home.is_none());
            assert!(record.ratings.sp.away.is_none());
            assert!(!record.fbs_only);
        }
        assert_eq!(outcome.coverage.team_info_matched, 1);
    }

    #[test]
    fn test_empty_games_abort_before_loading() {
        let mut loaded = false;
        let result = fuse_with(Vec::new(), || {
            loaded = true;
            SupplementalData::default()
        });

        assert!(matches!(result, Err(FusionError::NoGames)));
        assert!(!loaded);
    }

    #[test]
    fn test_missing_venue_id() {
        let game = Game::new(2024, 3, "Army", "Navy");
        let data = SupplementalData {
            venues: vec![VenueRecord::new(101, "Ohio Stadium")],
            ..Default::default()
        };

        let outcome = fuse_season(vec![game], data).unwrap();
        assert!(outcome.games[0].venue_info.is_none());
    }

    #[test]
    fn test_matched_entries_are_complete() {
        let mut rating = SpRating::new("Georgia", 21.5);
        rating
            .extra
            .insert("offense".to_string(), serde_json::json!({ "rating": 35.0 }));

        let data = SupplementalData {
            sp_ratings: vec![rating.clone()],
            ..Default::default()
        };
        let games = vec![Game::new(2024, 4, "Georgia", "Auburn")];
        let outcome = fuse_season(games, data).unwrap();

        assert_eq!(outcome.games[0].ratings.sp.home.as_ref(), Some(&rating));
    }
}
