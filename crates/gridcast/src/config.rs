//! Run configuration.
//!
//! Everything a run needs is gathered into one [`RunConfig`] built at
//! startup and passed down. Values come from an optional TOML file; the API
//! key may also come from the `CFB_API_KEY` environment variable or a `.env`
//! file, and is never written back out.

use gridcast_data::cfbd::SeasonType;
use gridcast_features::SplitConfig;
use gridcast_model::BoosterConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the CFBD API key.
pub const API_KEY_ENV: &str = "CFB_API_KEY";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for a run
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),

    /// No API key in the file or the environment
    #[error("missing API key: set CFB_API_KEY or api_key in the config file")]
    MissingApiKey,
}

/// Configuration for one fusion or prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Season year (default: 2024)
    pub season: i32,
    /// Season segment to fetch (default: regular)
    pub season_type: SeasonType,
    /// Train/predict split
    pub split: SplitConfig,
    /// Booster hyperparameters shared by both score models
    pub booster: BoosterConfig,
    /// SQLite store location; the platform cache directory when unset
    pub store_path: Option<PathBuf>,
    /// CFBD API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            season: 2024,
            season_type: SeasonType::Regular,
            split: SplitConfig::default(),
            booster: BoosterConfig::default(),
            store_path: None,
            api_key: None,
        }
    }
}

impl RunConfig {
    /// Parse a config from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on invalid TOML or mistyped values, and
    /// [`ConfigError::Invalid`] on out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the split and booster settings.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.split
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.booster
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Load a config from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Fill the API key from `.env` or the environment when the file had none.
    pub fn with_env(mut self) -> Self {
        let _ = dotenv::dotenv();
        if self.api_key.is_none() {
            self.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
        self
    }

    /// The API key, required for any fetch.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] if none is configured.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}
