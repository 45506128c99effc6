//! Supplemental datasets joined onto games.
//!
//! Team-keyed datasets expose their team name through [`TeamKeyed`]; venues
//! are keyed by their raw numeric identifier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record addressable by a team name.
pub trait TeamKeyed {
    /// Name of the dataset, used in diagnostics.
    const DATASET: &'static str;

    /// The team name this record belongs to, if present.
    fn team_name(&self) -> Option<&str>;
}

/// FBS team metadata from `/teams/fbs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    /// Upstream team identifier
    #[serde(default)]
    pub id: Option<u64>,
    /// School name (the join field for this dataset)
    #[serde(default)]
    pub school: Option<String>,
    /// Mascot
    #[serde(default)]
    pub mascot: Option<String>,
    /// Short abbreviation
    #[serde(default)]
    pub abbreviation: Option<String>,
    /// Conference
    #[serde(default)]
    pub conference: Option<String>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamKeyed for TeamRecord {
    const DATASET: &'static str = "teams";

    fn team_name(&self) -> Option<&str> {
        self.school.as_deref()
    }
}

/// SP+ rating from `/ratings/sp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpRating {
    /// Season year
    #[serde(default)]
    pub year: Option<i32>,
    /// Team name
    #[serde(default)]
    pub team: Option<String>,
    /// Conference
    #[serde(default)]
    pub conference: Option<String>,
    /// Overall SP+ rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// National ranking, as sent upstream
    #[serde(default)]
    pub ranking: Option<Value>,
    /// Offense, defense and special teams breakdowns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpRating {
    /// Create a rating with a team and overall value.
    pub fn new(team: &str, rating: f64) -> Self {
        Self {
            year: None,
            team: Some(team.to_string()),
            conference: None,
            rating: Some(rating),
            ranking: None,
            extra: Map::new(),
        }
    }
}

impl TeamKeyed for SpRating {
    const DATASET: &'static str = "ratings_sp";

    fn team_name(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

/// FPI rating from `/ratings/fpi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FpiRating {
    /// Season year
    #[serde(default)]
    pub year: Option<i32>,
    /// Team name
    #[serde(default)]
    pub team: Option<String>,
    /// Conference
    #[serde(default)]
    pub conference: Option<String>,
    /// Overall FPI
    #[serde(default)]
    pub fpi: Option<f64>,
    /// Resume ranks and efficiencies
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FpiRating {
    /// Create a rating with a team and overall value.
    pub fn new(team: &str, fpi: f64) -> Self {
        Self {
            year: None,
            team: Some(team.to_string()),
            conference: None,
            fpi: Some(fpi),
            extra: Map::new(),
        }
    }
}

impl TeamKeyed for FpiRating {
    const DATASET: &'static str = "ratings_fpi";

    fn team_name(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

/// A team season statistic from `/stats/season`.
///
/// The endpoint returns one row per team and statistic; indexing by team
/// therefore keeps the last statistic listed for each team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatRecord {
    /// Season year
    #[serde(default)]
    pub season: Option<i32>,
    /// Team name
    #[serde(default)]
    pub team: Option<String>,
    /// Conference
    #[serde(default)]
    pub conference: Option<String>,
    /// Statistic name
    #[serde(default)]
    pub stat_name: Option<String>,
    /// Statistic value; numeric for counts, text for values like `"30:12"`
    #[serde(default)]
    pub stat_value: Option<Value>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamKeyed for SeasonStatRecord {
    const DATASET: &'static str = "stats_season";

    fn team_name(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

/// Win/loss standings from `/records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRecord {
    /// Season year
    #[serde(default)]
    pub year: Option<i32>,
    /// Team name
    #[serde(default)]
    pub team: Option<String>,
    /// Conference
    #[serde(default)]
    pub conference: Option<String>,
    /// Division within the conference
    #[serde(default)]
    pub division: Option<String>,
    /// Expected wins, as sent upstream
    #[serde(default)]
    pub expected_wins: Option<Value>,
    /// Total, conference, home and away splits
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TeamKeyed for StandingsRecord {
    const DATASET: &'static str = "records";

    fn team_name(&self) -> Option<&str> {
        self.team.as_deref()
    }
}

/// Venue details from `/venues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueRecord {
    /// Venue identifier (the join field for this dataset)
    #[serde(default)]
    pub id: Option<u64>,
    /// Venue name
    #[serde(default)]
    pub name: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// State
    #[serde(default)]
    pub state: Option<String>,
    /// Seating capacity
    #[serde(default)]
    pub capacity: Option<Value>,
    /// Whether the venue is domed
    #[serde(default)]
    pub dome: Option<Value>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VenueRecord {
    /// Create a venue with an identifier and name.
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: Some(id),
            name: Some(name.to_string()),
            city: None,
            state: None,
            capacity: None,
            dome: None,
            extra: Map::new(),
        }
    }
}
