//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Remote provider settings. Fixed per installation, not chosen per request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Image edit provider (Gemini)
    pub edit: EditProviderConfig,

    /// Image description provider (OpenRouter)
    pub describe: DescribeProviderConfig,
}

/// Gemini `generateContent` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditProviderConfig {
    /// API base URL, without the `/models/...` suffix
    pub endpoint: String,

    /// Model name
    pub model: String,
}

impl Default for EditProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-image-preview".to_string(),
        }
    }
}

/// OpenRouter chat-completions settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeProviderConfig {
    /// Full chat-completions URL
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Response token ceiling
    pub max_tokens: u32,

    /// Sent as `HTTP-Referer` for usage attribution
    pub referer: String,

    /// Sent as `X-Title` for usage attribution
    pub title: String,
}

impl Default for DescribeProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            model: "google/gemini-flash-1.5".to_string(),
            max_tokens: 512,
            referer: "http://localhost".to_string(),
            title: "AI Photo Editor".to_string(),
        }
    }
}

/// Input limits. Advisory only: exceeding them logs a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Soft maximum image size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
        }
    }
}

/// Credential store location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Override for the credentials file. Empty means the platform default.
    pub path: String,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
