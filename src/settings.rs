//! Process configuration: store address, debounce window and leaderboard shape.
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. an optional TOML file (`reeltrend.toml` in the working directory by default)
//! 3. environment variables prefixed `REELTREND__`, nested with `__`
//!    (for example `REELTREND__STORE__TABLE_ID=metrics`)

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::TableRef;
use crate::trending::{DEFAULT_IMAGE_BASE_URL, DEFAULT_TRENDING_LIMIT};

/// Quiet period after the last edit before a search settles.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

const ENV_PREFIX: &str = "REELTREND";
const CONFIG_FILE: &str = "reeltrend.toml";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreSettings,
    pub search: SearchSettings,
    pub trending: TrendingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub database_id: String,
    pub table_id: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_id: "reeltrend".into(),
            table_id: "trending_searches".into(),
        }
    }
}

impl StoreSettings {
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(self.database_id.clone(), self.table_id.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingSettings {
    pub limit: usize,
    pub image_base_url: String,
}

impl Default for TrendingSettings {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TRENDING_LIMIT,
            image_base_url: DEFAULT_IMAGE_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load from `reeltrend.toml` in the working directory (if present) and
    /// the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = env::current_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .ok();
        Self::from_sources(file.as_deref(), true)
    }

    /// Load from an optional file and, when `use_env` is set, the environment.
    pub fn from_sources(file: Option<&Path>, use_env: bool) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(PathBuf::from(path)).required(false));
        }

        if use_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.database_id.trim().is_empty() || self.store.table_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store.database_id and store.table_id must be set".into(),
            ));
        }
        if self.search.debounce_ms == 0 {
            return Err(ConfigError::Invalid("search.debounce_ms must be positive".into()));
        }
        if self.trending.limit == 0 {
            return Err(ConfigError::Invalid("trending.limit must be positive".into()));
        }
        Ok(())
    }
}
