//! Fetch, fuse and persist a season.
//!
//! Games are fetched first; an empty list aborts before any supplemental
//! dataset is requested. Supplemental failures only reduce coverage.

use gridcast::data::cfbd::CfbdClient;
use gridcast::data::store::{GameStore, SqliteGameStore};
use gridcast::data::{
    DataError, FusionError, FusionOutcome, GameRecord, ensure_games, fuse_season,
};
use gridcast::{ConfigError, RunConfig};
use indicatif::ProgressBar;
use tracing::info;

/// Error type for data pipeline operations.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DataPipelineError {
    /// Fetch or storage error.
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    /// No games to fuse.
    #[error("{0}")]
    Fusion(#[from] FusionError),
    /// Missing API key.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// Nothing stored for the season.
    #[error("No stored games for season {0}; run `gridcast fuse --year {0}` first")]
    NotStored(i32),
}

fn progress(pb: Option<&ProgressBar>, message: &'static str) {
    if let Some(pb) = pb {
        pb.set_message(message);
    }
}

/// Fetch every dataset for the configured season and fuse them.
pub(crate) async fn fetch_and_fuse(
    config: &RunConfig,
    pb: Option<&ProgressBar>,
) -> Result<FusionOutcome, DataPipelineError> {
    let client = CfbdClient::new(config.require_api_key()?)?;

    progress(pb, "Fetching games...");
    let games = client.games(config.season, config.season_type).await?;
    ensure_games(&games)?;

    progress(pb, "Fetching supplemental datasets...");
    let data = client.fetch_supplemental(config.season).await;

    progress(pb, "Fusing...");
    Ok(fuse_season(games, data)?)
}

/// Rebuild the stored season from fresh data.
pub(crate) async fn refresh_season(
    config: &RunConfig,
    store: &mut SqliteGameStore,
    pb: Option<&ProgressBar>,
) -> Result<FusionOutcome, DataPipelineError> {
    let outcome = fetch_and_fuse(config, pb).await?;

    progress(pb, "Storing...");
    let stored = store.replace_season(config.season, &outcome.games)?;
    info!(season = config.season, stored, "replaced stored season");

    Ok(outcome)
}

/// Stored games for the season, fetching them first if needed or asked.
pub(crate) async fn load_or_refresh(
    config: &RunConfig,
    store: &mut SqliteGameStore,
    refresh: bool,
    pb: Option<&ProgressBar>,
) -> Result<Vec<GameRecord>, DataPipelineError> {
    if !refresh && store.count(config.season)? > 0 {
        progress(pb, "Loading stored games...");
        return Ok(store.load_season(config.season)?);
    }
    Ok(refresh_season(config, store, pb).await?.games)
}

/// Stored games for the season; never fetches.
pub(crate) fn load_stored(
    config: &RunConfig,
    store: &SqliteGameStore,
) -> Result<Vec<GameRecord>, DataPipelineError> {
    let games = store.load_season(config.season)?;
    if games.is_empty() {
        return Err(DataPipelineError::NotStored(config.season));
    }
    Ok(games)
}
