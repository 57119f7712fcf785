//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate that configuration values are usable.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.providers.edit.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.edit.endpoint must not be empty".into(),
            ));
        }
        if self.providers.edit.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.edit.model must not be empty".into(),
            ));
        }
        if self.providers.describe.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.describe.endpoint must not be empty".into(),
            ));
        }
        if self.providers.describe.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "providers.describe.model must not be empty".into(),
            ));
        }
        if self.providers.describe.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "providers.describe.max_tokens must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
