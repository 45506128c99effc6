//! Primary game records, before and after fusion.

use super::supplemental::{
    FpiRating, SeasonStatRecord, SpRating, StandingsRecord, TeamRecord, VenueRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A game as returned by the `/games` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Upstream game identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// Season year
    pub season: i32,
    /// Week number within the season
    pub week: u32,
    /// Season type ("regular" or "postseason")
    #[serde(default)]
    pub season_type: Option<String>,
    /// Home team name
    #[serde(default)]
    pub home_team: Option<String>,
    /// Home team conference
    #[serde(default)]
    pub home_conference: Option<String>,
    /// Home team final score, absent if not yet played
    #[serde(default)]
    pub home_points: Option<u32>,
    /// Away team name
    #[serde(default)]
    pub away_team: Option<String>,
    /// Away team conference
    #[serde(default)]
    pub away_conference: Option<String>,
    /// Away team final score, absent if not yet played
    #[serde(default)]
    pub away_points: Option<u32>,
    /// Venue identifier
    #[serde(default)]
    pub venue_id: Option<u64>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Game {
    /// Create a game with only the identifying fields set.
    pub fn new(season: i32, week: u32, home_team: &str, away_team: &str) -> Self {
        Self {
            id: None,
            season,
            week,
            season_type: None,
            home_team: Some(home_team.to_string()),
            home_conference: None,
            home_points: None,
            away_team: Some(away_team.to_string()),
            away_conference: None,
            away_points: None,
            venue_id: None,
            extra: Map::new(),
        }
    }

    /// Set the conference tags.
    pub fn with_conferences(mut self, home: &str, away: &str) -> Self {
        self.home_conference = Some(home.to_string());
        self.away_conference = Some(away.to_string());
        self
    }

    /// Set the final score.
    pub const fn with_points(mut self, home: u32, away: u32) -> Self {
        self.home_points = Some(home);
        self.away_points = Some(away);
        self
    }

    /// Set the venue identifier.
    pub const fn with_venue(mut self, venue_id: u64) -> Self {
        self.venue_id = Some(venue_id);
        self
    }

    /// Whether both scores are known.
    pub const fn is_completed(&self) -> bool {
        self.home_points.is_some() && self.away_points.is_some()
    }
}

/// A home/away pair of optional matches.
///
/// Each side is either the complete matched entry or `None`; it is never
/// partially filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidePair<T> {
    /// Entry matched for the home team
    pub home: Option<T>,
    /// Entry matched for the away team
    pub away: Option<T>,
}

impl<T> Default for SidePair<T> {
    fn default() -> Self {
        Self {
            home: None,
            away: None,
        }
    }
}

impl<T> SidePair<T> {
    /// Build a pair from two lookups.
    pub const fn new(home: Option<T>, away: Option<T>) -> Self {
        Self { home, away }
    }

    /// Whether at least one side matched.
    pub const fn any_matched(&self) -> bool {
        self.home.is_some() || self.away.is_some()
    }

    /// Whether both sides matched.
    pub const fn both_matched(&self) -> bool {
        self.home.is_some() && self.away.is_some()
    }
}

/// Rating systems attached to a fused game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    /// SP+ ratings
    pub sp: SidePair<SpRating>,
    /// ESPN FPI ratings
    pub fpi: SidePair<FpiRating>,
}

/// A game after fusion with every supplemental dataset.
///
/// Every nested slot is always present; unmatched slots serialize as an
/// explicit `null`. Records are not mutated after the fusion engine emits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// The primary game
    #[serde(flatten)]
    pub game: Game,
    /// SP+ and FPI ratings per side
    pub ratings: Ratings,
    /// FBS team metadata per side
    pub team_info: SidePair<TeamRecord>,
    /// Season statistic per side
    pub season_stats: SidePair<SeasonStatRecord>,
    /// Win/loss record per side
    pub records: SidePair<StandingsRecord>,
    /// Venue details
    pub venue_info: Option<VenueRecord>,
    /// True iff at least one side has an SP+ rating
    pub fbs_only: bool,
}

impl GameRecord {
    /// Wrap a game with every nested slot absent.
    pub fn unmatched(game: Game) -> Self {
        Self {
            game,
            ratings: Ratings::default(),
            team_info: SidePair::default(),
            season_stats: SidePair::default(),
            records: SidePair::default(),
            venue_info: None,
            fbs_only: false,
        }
    }
}
