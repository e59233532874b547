use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.rollbar.com/api/1/item/";

/// Connection settings for [`RollbarClient`](crate::client::RollbarClient).
///
/// Passed explicitly to the client instead of living in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollbarConfig {
    /// Project access token with `post_server_item` scope.
    pub access_token: String,
    pub environment: String,
    pub endpoint: String,
    /// Request timeout in milliseconds.
    #[serde(with = "super::duration_ms")]
    pub timeout: Duration,
    pub code_version: Option<String>,
}

impl Default for RollbarConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            environment: "development".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(5),
            code_version: None,
        }
    }
}

impl RollbarConfig {
    pub fn new(access_token: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            environment: environment.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `ROLLBAR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(token) = env_override("ROLLBAR_TOKEN") {
            self.access_token = token;
        }
        if let Some(environment) = env_override("ROLLBAR_ENVIRONMENT") {
            self.environment = environment;
        }
        if let Some(endpoint) = env_override("ROLLBAR_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(code_version) = env_override("ROLLBAR_CODE_VERSION") {
            self.code_version = Some(code_version);
        }
        if let Some(raw) = env_override("ROLLBAR_TIMEOUT_MS") {
            let millis: u64 = raw.trim().parse().map_err(|e| {
                ConfigError::EnvError(format!(
                    "ROLLBAR_TIMEOUT_MS must be milliseconds, got {raw:?}: {e}"
                ))
            })?;
            self.timeout = Duration::from_millis(millis);
        }
        Ok(())
    }
}

/// A set, non-blank `ROLLBAR_*` variable.
fn env_override(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
