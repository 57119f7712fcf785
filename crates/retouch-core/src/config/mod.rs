//! Configuration management for Retouch.
//!
//! Configuration is loaded from `config.toml` in the platform config directory
//! with sensible defaults. Every section implements `Default`, so a missing or
//! partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Retouch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote provider settings
    pub providers: ProvidersConfig,

    /// Input limits
    pub limits: LimitsConfig,

    /// Credential store settings
    pub credentials: CredentialsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Directory holding `config.toml` and `credentials.toml`.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.retouch.retouch
    /// - Linux: ~/.config/retouch
    /// - Windows: C:\Users\<User>\AppData\Roaming\retouch\config
    ///
    /// Falls back to ~/.retouch if directory detection fails.
    pub fn config_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "retouch", "retouch")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".retouch")
            })
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Resolved credentials file path (with ~ expansion).
    pub fn credentials_path(&self) -> PathBuf {
        if self.credentials.path.trim().is_empty() {
            return Self::config_dir().join("credentials.toml");
        }
        let expanded = shellexpand::tilde(&self.credentials.path);
        PathBuf::from(expanded.into_owned())
    }

    /// Soft image size limit in bytes. Saturates rather than overflowing.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.limits.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
