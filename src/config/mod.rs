mod duration_ms;
mod rollbar;
mod sink;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use rollbar::{DEFAULT_ENDPOINT, RollbarConfig};
pub use sink::SinkConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Everything needed to wire a sink to Rollbar, as laid out in a TOML file:
///
/// ```toml
/// [rollbar]
/// access_token = "..."
/// environment = "production"
///
/// [sink]
/// min_level = "error"
/// sync_on_write = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rollbar: RollbarConfig,
    pub sink: SinkConfig,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(contents)?;
        settings.rollbar.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// File settings with `ROLLBAR_*` environment variables taking precedence.
    pub fn from_file_and_env(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut settings: Settings = toml::from_str(&contents)?;
        settings.rollbar.apply_env()?;
        settings.rollbar.validate()?;
        Ok(settings)
    }
}
