//! Lookup indexes over the supplemental datasets.
//!
//! Team-keyed datasets are indexed by [`normalize`]d team name; venues by
//! their raw identifier. Duplicate keys keep the last entry seen. Upstream
//! duplicates are not expected, so the overwrite is silent apart from a
//! debug-level count. Records whose team name normalizes to an empty key are
//! not indexed, so a game with a missing team name never matches anything.

use crate::normalize::normalize;
use crate::records::{
    FpiRating, SeasonStatRecord, SpRating, StandingsRecord, TeamKeyed, TeamRecord, VenueRecord,
};
use std::collections::HashMap;
use tracing::debug;

/// Materialized supplemental datasets for one season.
///
/// Any dataset may be empty; fusion still runs and the matching slots stay
/// absent for every game.
#[derive(Debug, Clone, Default)]
pub struct SupplementalData {
    /// FBS teams
    pub teams: Vec<TeamRecord>,
    /// SP+ ratings
    pub sp_ratings: Vec<SpRating>,
    /// FPI ratings
    pub fpi_ratings: Vec<FpiRating>,
    /// Season statistics
    pub season_stats: Vec<SeasonStatRecord>,
    /// Standings
    pub records: Vec<StandingsRecord>,
    /// Venues
    pub venues: Vec<VenueRecord>,
}

/// Index of a team-keyed dataset by normalized team name.
#[derive(Debug, Clone)]
pub struct TeamIndex<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for TeamIndex<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: TeamKeyed> TeamIndex<T> {
    /// Build an index, last entry wins on duplicate keys.
    pub fn build(records: impl IntoIterator<Item = T>) -> Self {
        let mut entries = HashMap::new();
        let mut overwritten = 0usize;
        let mut unnamed = 0usize;

        for record in records {
            let key = normalize(record.team_name());
            if key.is_empty() {
                unnamed += 1;
                continue;
            }
            if entries.insert(key, record).is_some() {
                overwritten += 1;
            }
        }

        if overwritten > 0 || unnamed > 0 {
            debug!(
                dataset = T::DATASET,
                overwritten, unnamed, "duplicate or empty keys while indexing"
            );
        }

        Self { entries }
    }
}

impl<T> TeamIndex<T> {
    /// Look up an entry by an already-normalized key.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index of venues by raw identifier.
#[derive(Debug, Clone, Default)]
pub struct VenueIndex {
    entries: HashMap<u64, VenueRecord>,
}

impl VenueIndex {
    /// Build an index, last entry wins on duplicate ids.
    ///
    /// Venues without an identifier cannot be joined and are skipped.
    pub fn build(venues: impl IntoIterator<Item = VenueRecord>) -> Self {
        let mut entries = HashMap::new();
        let mut skipped = 0usize;

        for venue in venues {
            match venue.id {
                Some(id) => {
                    entries.insert(id, venue);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(skipped, "venues without an id were not indexed");
        }

        Self { entries }
    }

    /// Look up a venue.
    pub fn get(&self, id: u64) -> Option<&VenueRecord> {
        self.entries.get(&id)
    }

    /// Number of indexed venues.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All supplemental indexes, built before fusion starts.
#[derive(Debug, Clone, Default)]
pub struct Indexes {
    /// FBS teams by school
    pub teams: TeamIndex<TeamRecord>,
    /// SP+ ratings by team
    pub sp: TeamIndex<SpRating>,
    /// FPI ratings by team
    pub fpi: TeamIndex<FpiRating>,
    /// Season statistics by team
    pub season_stats: TeamIndex<SeasonStatRecord>,
    /// Standings by team
    pub records: TeamIndex<StandingsRecord>,
    /// Venues by id
    pub venues: VenueIndex,
}

impl Indexes {
    /// Build every index from the supplemental datasets.
    pub fn build(data: SupplementalData) -> Self {
        let indexes = Self {
            teams: TeamIndex::build(data.teams),
            sp: TeamIndex::build(data.sp_ratings),
            fpi: TeamIndex::build(data.fpi_ratings),
            season_stats: TeamIndex::build(data.season_stats),
            records: TeamIndex::build(data.records),
            venues: VenueIndex::build(data.venues),
        };

        debug!(
            teams = indexes.teams.len(),
            sp = indexes.sp.len(),
            fpi = indexes.fpi.len(),
            season_stats = indexes.season_stats.len(),
            records = indexes.records.len(),
            venues = indexes.venues.len(),
            "built supplemental indexes"
        );

        indexes
    }
}
