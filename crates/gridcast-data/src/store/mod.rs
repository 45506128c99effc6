//! Persistence for fused game records.

pub mod sqlite;

pub use sqlite::{SqliteGameStore, StoreStats};

use crate::error::Result;
use crate::records::GameRecord;

/// A store of fused games, written one season batch at a time.
pub trait GameStore {
    /// Clear the season's stored games, then insert `games` as the new batch.
    ///
    /// Returns the number of games written.
    fn replace_season(&mut self, season: i32, games: &[GameRecord]) -> Result<usize>;

    /// Load a season's fused games in insertion order.
    fn load_season(&self, season: i32) -> Result<Vec<GameRecord>>;

    /// Number of stored games for a season.
    fn count(&self, season: i32) -> Result<usize>;
}
