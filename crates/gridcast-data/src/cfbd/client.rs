//! CFBD API client with rate limiting and retry.

use super::retry::RetryPolicy;
use crate::error::{DataError, Result};
use crate::index::SupplementalData;
use crate::records::{
    FpiRating, Game, SeasonStatRecord, SpRating, StandingsRecord, TeamRecord, VenueRecord,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use serde_json::Value;
use tracing::{debug, info, warn};

/// CFBD API base URL
const CFBD_BASE_URL: &str = "https://api.collegefootballdata.com";

/// Default spacing between requests
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(200);

/// Season segment for the games endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    /// Regular season
    #[default]
    Regular,
    /// Bowls and playoffs
    Postseason,
}

impl SeasonType {
    /// Query parameter value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Postseason => "postseason",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SeasonType {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "postseason" => Ok(Self::Postseason),
            other => Err(DataError::Parse(format!("Invalid season type: {}", other))),
        }
    }
}

/// Spaces requests at least `min_interval` apart
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// CFBD API client.
///
/// Holds the API key for the run; construct one per run and pass it to
/// whatever needs to fetch.
pub struct CfbdClient {
    client: reqwest::Client,
    api_key: String,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    retry: RetryPolicy,
    base_url: String,
}

impl fmt::Debug for CfbdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CfbdClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CfbdClient {
    /// Create a client with default rate limiting and retry policy.
    ///
    /// # Errors
    /// Returns [`DataError::MissingApiKey`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_RATE_LIMIT, RetryPolicy::default())
    }

    /// Create a client with a custom request interval and retry policy.
    ///
    /// # Errors
    /// Returns [`DataError::MissingApiKey`] if `api_key` is empty.
    pub fn with_options(
        api_key: impl Into<String>,
        min_interval: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DataError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            api_key,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(min_interval))),
            retry,
            base_url: CFBD_BASE_URL.to_string(),
        })
    }

    /// Point the client at another host (a mirror or a local fixture server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Regular- or post-season games for a year.
    pub async fn games(&self, year: i32, season_type: SeasonType) -> Result<Vec<Game>> {
        self.fetch(
            "games",
            &[
                ("year", year.to_string()),
                ("seasonType", season_type.as_str().to_string()),
            ],
        )
        .await
    }

    /// FBS teams for a year.
    pub async fn fbs_teams(&self, year: i32) -> Result<Vec<TeamRecord>> {
        self.fetch("teams/fbs", &[("year", year.to_string())]).await
    }

    /// SP+ ratings for a year.
    pub async fn sp_ratings(&self, year: i32) -> Result<Vec<SpRating>> {
        self.fetch("ratings/sp", &[("year", year.to_string())]).await
    }

    /// FPI ratings for a year.
    pub async fn fpi_ratings(&self, year: i32) -> Result<Vec<FpiRating>> {
        self.fetch("ratings/fpi", &[("year", year.to_string())]).await
    }

    /// Team season statistics for a year.
    pub async fn season_stats(&self, year: i32) -> Result<Vec<SeasonStatRecord>> {
        self.fetch("stats/season", &[("year", year.to_string())])
            .await
    }

    /// Team records for a year.
    pub async fn records(&self, year: i32) -> Result<Vec<StandingsRecord>> {
        self.fetch("records", &[("year", year.to_string())]).await
    }

    /// All venues.
    pub async fn venues(&self) -> Result<Vec<VenueRecord>> {
        self.fetch("venues", &[]).await
    }

    /// Fetch every supplemental dataset for a year.
    ///
    /// A dataset that fails or comes back empty is logged as a warning and
    /// replaced by an empty vector; this never fails.
    pub async fn fetch_supplemental(&self, year: i32) -> SupplementalData {
        SupplementalData {
            teams: or_empty("teams/fbs", self.fbs_teams(year).await),
            sp_ratings: or_empty("ratings/sp", self.sp_ratings(year).await),
            fpi_ratings: or_empty("ratings/fpi", self.fpi_ratings(year).await),
            season_stats: or_empty("stats/season", self.season_stats(year).await),
            records: or_empty("records", self.records(year).await),
            venues: or_empty("venues", self.venues().await),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.rate_limiter.lock().await.wait().await;

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.api_key)
                .query(params)
                .send()
                .await;

            let failure = match response {
                Ok(resp) if resp.status().is_success() => {
                    let rows: Vec<Value> = resp.json().await.map_err(|e| {
                        DataError::Parse(format!("Failed to parse {}: {}", endpoint, e))
                    })?;
                    let data = decode_rows(endpoint, rows);
                    info!("Fetched {} items from {}", data.len(), endpoint);
                    return Ok(data);
                }
                Ok(resp) => {
                    let status = resp.status();
                    if !RetryPolicy::is_retryable_status(status) {
                        return Err(DataError::Http {
                            endpoint: endpoint.to_string(),
                            status: status.as_u16(),
                        });
                    }
                    format!("HTTP {}", status)
                }
                Err(e) => {
                    if !RetryPolicy::is_retryable_error(&e) {
                        return Err(DataError::Network(e));
                    }
                    e.to_string()
                }
            };

            if !self.retry.should_retry(attempt) {
                return Err(DataError::RetriesExhausted {
                    endpoint: endpoint.to_string(),
                    attempts: attempt,
                    reason: failure,
                });
            }

            let delay = self.retry.backoff(attempt);
            warn!(
                endpoint,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "request failed ({}), retrying",
                failure
            );
            sleep(delay).await;
        }
    }
}

/// Decode rows one at a time; a malformed row is skipped, not the whole list.
fn decode_rows<T: DeserializeOwned>(endpoint: &str, rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let mut skipped = 0usize;
    let data: Vec<T> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                skipped += 1;
                debug!(endpoint, "skipping malformed row: {}", e);
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!(endpoint, skipped, total, "skipped malformed rows");
    }
    data
}

/// Downgrade a supplemental fetch failure to a warning and an empty dataset.
fn or_empty<T>(endpoint: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(data) => {
            if data.is_empty() {
                warn!("No data returned for {}", endpoint);
            }
            data
        }
        Err(e) => {
            warn!("Failed to fetch {}: {}", endpoint, e);
            Vec::new()
        }
    }
}
