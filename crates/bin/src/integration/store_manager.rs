//! Game store location and opening.

use gridcast::RunConfig;
use gridcast::data::DataError;
use gridcast::data::store::SqliteGameStore;
use std::path::PathBuf;

/// Get the default store directory path.
///
/// Uses platform-specific cache directories:
/// - Linux: `~/.cache/gridcast/`
/// - macOS: `~/Library/Caches/gridcast/`
/// - Windows: `%LOCALAPPDATA%\gridcast\`
pub(crate) fn default_store_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gridcast")
}

/// Get the default store database path.
pub(crate) fn default_store_path() -> PathBuf {
    default_store_dir().join("games.db")
}

/// The configured store path, or the default.
pub(crate) fn store_path(config: &RunConfig) -> PathBuf {
    config.store_path.clone().unwrap_or_else(default_store_path)
}

/// Open the store, creating the directory if needed.
pub(crate) fn open_store(config: &RunConfig) -> Result<SqliteGameStore, DataError> {
    let path = store_path(config);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    SqliteGameStore::new(&path)
}
