use super::{ConfigError, RollbarConfig};
use url::Url;

impl RollbarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid endpoint URL '{}': {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "Endpoint must use http or https: {}",
                self.endpoint
            )));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.environment.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "Environment must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
