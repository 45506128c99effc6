//! Column names of the flattened game table.

/// Home team name
pub const HOME_TEAM: &str = "home_team";
/// Away team name
pub const AWAY_TEAM: &str = "away_team";
/// Home team conference
pub const HOME_CONFERENCE: &str = "home_conference";
/// Away team conference
pub const AWAY_CONFERENCE: &str = "away_conference";
/// Home final score
pub const HOME_POINTS: &str = "home_points";
/// Away final score
pub const AWAY_POINTS: &str = "away_points";
/// Week number
pub const WEEK: &str = "week";
/// Season year
pub const SEASON: &str = "season";
/// At least one side has an SP+ rating
pub const FBS_ONLY: &str = "fbs_only";
