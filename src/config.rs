//! Global configuration parsing and validation.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{PlotError, Result};

/// Plotting-engine settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Name of the engine binary resolved via `whereis -b`.
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
        }
    }
}

fn default_binary() -> String {
    "gnuplot".into()
}

/// Configurable timeout values (seconds) for bounded pipe reads.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Maximum wait for a single byte of subprocess output.
    #[serde(default = "default_read_seconds")]
    pub read_seconds: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_seconds: default_read_seconds(),
        }
    }
}

fn default_read_seconds() -> u64 {
    2
}

/// Global configuration parsed from `config.toml`.
///
/// Every section is optional; an absent file yields the defaults
/// (`gnuplot` binary, 2-second read timeout, no database).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Plotting-engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Timeout settings for bounded reads.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// `SQLite` connection URL for the tabular data source
    /// (e.g., `sqlite://data.db` or `sqlite::memory:`).
    #[serde(default)]
    pub database_url: Option<String>,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `PlotError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| PlotError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `PlotError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read timeout as a [`Duration`].
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.timeouts.read_seconds)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.binary.trim().is_empty() {
            return Err(PlotError::Config("engine.binary must not be empty".into()));
        }

        if self.timeouts.read_seconds == 0 {
            return Err(PlotError::Config(
                "timeouts.read_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
