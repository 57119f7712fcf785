//! Error types for Retouch.
//!
//! Errors are organized by concern: configuration files, image acquisition,
//! credential persistence, and the two remote AI services. Service errors are
//! what the session turns into its user-visible error message.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Retouch operations.
#[derive(Error, Debug)]
pub enum RetouchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image acquisition errors
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Credential persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Remote service errors
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors turning user-supplied bytes into an [`ImageAsset`](crate::ImageAsset).
#[derive(Error, Debug)]
pub enum ImageError {
    /// File not found
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The file or buffer has no content
    #[error("Image {name} is empty")]
    Empty { name: String },

    /// Content is not one of the accepted image types
    #[error("Unsupported format for {name}: {format} (expected PNG, JPEG or GIF)")]
    UnsupportedFormat { name: String, format: String },

    /// Reading the file failed
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Credential persistence failures. Never fatal: the session keeps the
/// in-memory values and only warns.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store could not be read
    #[error("Could not read credential store at {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// The backing store could not be written
    #[error("Could not write credential store at {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// Storage is switched off or otherwise refuses writes
    #[error("Credential storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the edit and describe clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// A required credential is missing. Raised before any network call.
    #[error("{0}")]
    Config(String),

    /// The remote call failed, was rejected, or returned no usable payload.
    #[error("{provider} API error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
        status_code: Option<u16>,
    },

    /// The response did not match the expected shape.
    #[error("Invalid response from {provider} API: {detail}")]
    Protocol {
        provider: &'static str,
        detail: String,
    },
}

impl ServiceError {
    /// The bare provider message, without the provider prefix.
    pub fn message(&self) -> &str {
        match self {
            ServiceError::Config(message) => message,
            ServiceError::Provider { message, .. } => message,
            ServiceError::Protocol { detail, .. } => detail,
        }
    }
}

/// Convenience type alias for Retouch results.
pub type Result<T> = std::result::Result<T, RetouchError>;

/// Convenience type alias for service call results.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
