//! Application Configuration
//!
//! Defaults match the demo backend. A TOML file can override any field and
//! a few environment variables override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dashboard::display::ChartPoint;
use crate::dashboard::panel::ServerSettings;
use crate::dashboard::profile::UserProfile;
use crate::game::catalog::{Catalog, CatalogError, Game};
use crate::game::tick::TickConfig;
use crate::ledger::{UserStats, DEFAULT_MIN_WITHDRAWAL};
use crate::{DEFAULT_CURRENCY, TICK_INTERVAL_MS};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Bad environment override.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A field is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// The configured catalog is unusable.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Milliseconds between session ticks.
    pub tick_interval_ms: u64,
    /// Currency suffix for display.
    pub currency: String,
    /// Smallest accepted withdrawal.
    pub min_withdrawal: u64,
    /// Simulated latency of the config panel save.
    pub save_latency_ms: u64,
    /// Ledger seed values.
    pub initial_stats: UserStats,
    /// Profile shown on the profile tab.
    pub profile: UserProfile,
    /// Mock server settings.
    pub server: ServerSettings,
    /// Weekly earnings series for the revenue chart.
    pub weekly_earnings: Vec<ChartPoint>,
    /// Game catalog; empty means the built-in catalog.
    pub games: Vec<Game>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            currency: DEFAULT_CURRENCY.to_string(),
            min_withdrawal: DEFAULT_MIN_WITHDRAWAL,
            save_latency_ms: 1_500,
            initial_stats: UserStats::demo(),
            profile: UserProfile::default(),
            server: ServerSettings::default(),
            weekly_earnings: default_weekly_earnings(),
            games: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Parse from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `ARCADE_*` environment overrides.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(value) = lookup("ARCADE_TICK_INTERVAL_MS") {
            self.tick_interval_ms = parse_env("ARCADE_TICK_INTERVAL_MS", value)?;
        }
        if let Some(value) = lookup("ARCADE_SAVE_LATENCY_MS") {
            self.save_latency_ms = parse_env("ARCADE_SAVE_LATENCY_MS", value)?;
        }
        if let Some(value) = lookup("ARCADE_CURRENCY") {
            self.currency = value;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency must not be empty".into()));
        }
        Ok(())
    }

    /// Tick cadence.
    pub fn tick_config(&self) -> TickConfig {
        TickConfig::new(Duration::from_millis(self.tick_interval_ms))
    }

    /// Config panel save latency.
    pub fn save_latency(&self) -> Duration {
        Duration::from_millis(self.save_latency_ms)
    }

    /// The configured catalog, or the built-in one.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        if self.games.is_empty() {
            return Ok(Catalog::builtin());
        }
        Ok(Catalog::new(self.games.clone())?)
    }
}

fn parse_env(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

fn default_weekly_earnings() -> Vec<ChartPoint> {
    [
        ("Mon", 4_000),
        ("Tue", 3_000),
        ("Wed", 5_000),
        ("Thu", 2_780),
        ("Fri", 6_890),
        ("Sat", 8_200),
        ("Sun", 5_500),
    ]
    .into_iter()
    .map(|(label, amount)| ChartPoint::new(label, amount))
    .collect()
}
