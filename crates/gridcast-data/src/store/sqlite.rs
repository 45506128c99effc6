//! SQLite document store for fused games.
//!
//! Each fused game is stored as a JSON document alongside the columns used
//! to select it.

use super::GameStore;
use crate::error::Result;
use crate::records::GameRecord;
use chrono::Utc;
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::info;

/// SQLite-backed [`GameStore`].
#[derive(Debug)]
pub struct SqliteGameStore {
    conn: Connection,
}

/// Summary of the store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total stored games across seasons
    pub total_games: usize,
    /// Number of distinct seasons
    pub seasons: usize,
}

impl SqliteGameStore {
    /// Open (or create) a store at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                row_id INTEGER PRIMARY KEY AUTOINCREMENT,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                game_id INTEGER,
                data TEXT NOT NULL,
                stored_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_season_week ON games(season, week)",
            [],
        )?;

        Ok(())
    }

    /// Store statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let (total, seasons): (i64, i64) = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT season) FROM games",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StoreStats {
            total_games: total as usize,
            seasons: seasons as usize,
        })
    }
}

impl GameStore for SqliteGameStore {
    fn replace_season(&mut self, season: i32, games: &[GameRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;

        let cleared = tx.execute("DELETE FROM games WHERE season = ?1", params![season])?;
        info!(season, cleared, "cleared stored season");

        let stored_at = Utc::now().to_rfc3339();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO games (season, week, game_id, data, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in games {
                let data = serde_json::to_string(record)?;
                stmt.execute(params![
                    season,
                    record.game.week,
                    record.game.id.map(|id| id as i64),
                    data,
                    stored_at,
                ])?;
            }
        }

        tx.commit()?;
        info!("Inserted {} merged game records", games.len());

        Ok(games.len())
    }

    fn load_season(&self, season: i32) -> Result<Vec<GameRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT data FROM games WHERE season = ?1 ORDER BY row_id")?;

        let rows = stmt.query_map(params![season], |row| row.get::<_, String>(0))?;

        let mut games = Vec::new();
        for row in rows {
            games.push(serde_json::from_str(&row?)?);
        }

        Ok(games)
    }

    fn count(&self, season: i32) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM games WHERE season = ?1",
            params![season],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Game;

    fn records(season: i32, n: u32) -> Vec<GameRecord> {
        (1..=n)
            .map(|week| GameRecord::unmatched(Game::new(season, week, "Home", "Away")))
            .collect()
    }

    #[test]
    fn test_replace_and_load() {
        let mut store = SqliteGameStore::in_memory().unwrap();
        let written = store.replace_season(2024, &records(2024, 3)).unwrap();

        assert_eq!(written, 3);
        let loaded = store.load_season(2024).unwrap();
        assert_eq!(loaded, records(2024, 3));
    }

    #[test]
    fn test_replace_clears_previous_batch() {
        let mut store = SqliteGameStore::in_memory().unwrap();
        store.replace_season(2024, &records(2024, 5)).unwrap();
        store.replace_season(2024, &records(2024, 2)).unwrap();

        assert_eq!(store.count(2024).unwrap(), 2);
    }

    #[test]
    fn test_other_seasons_untouched() {
        let mut store = SqliteGameStore::in_memory().unwrap();
        store.replace_season(2023, &records(2023, 4)).unwrap();
        store.replace_season(2024, &records(2024, 1)).unwrap();

        assert_eq!(store.count(2023).unwrap(), 4);
        assert_eq!(
            store.stats().unwrap(),
            StoreStats {
                total_games: 5,
                seasons: 2
            }
        );
    }

    #[test]
    fn test_empty_season() {
        let store = SqliteGameStore::in_memory().unwrap();
        assert!(store.load_season(1999).unwrap().is_empty());
    }
}
