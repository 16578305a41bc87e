//! Runtime configuration.
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! - `DOCSEARCH_CONFIG`: config file path (default `<config dir>/docsearch/config.toml`)
//! - `DOCSEARCH_DATA_DIR`: overrides `data_dir`
//! - `DOCSEARCH_REFRESH_SECS`: overrides `refresh_interval_secs`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "docsearch";

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the library catalog and component records
    pub data_dir: PathBuf,

    /// Page size when a request gives no limit
    pub default_limit: usize,

    /// Number of terms returned by `popular_terms` when no limit is given
    pub popular_limit: usize,

    /// Capacity of the popularity tracker
    pub max_popular_terms: usize,

    /// Seconds between data directory rescans, 0 disables
    pub refresh_interval_secs: u64,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_limit: 20,
            popular_limit: 10,
            max_popular_terms: crate::popularity::DEFAULT_CAPACITY,
            refresh_interval_secs: 86_400,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of compact text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

impl Config {
    /// Loads configuration from the file and process environment.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration, reading environment variables through `env`.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = env("DOCSEARCH_CONFIG")
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env(env)?;
        Ok(config)
    }

    /// Parses a TOML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = env("DOCSEARCH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        if let Some(secs) = env("DOCSEARCH_REFRESH_SECS") {
            self.refresh_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid DOCSEARCH_REFRESH_SECS value '{}'", secs))?;
        }

        Ok(())
    }

    /// Interval between data directory rescans, `None` when disabled.
    pub const fn refresh_interval(&self) -> Option<Duration> {
        match self.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
