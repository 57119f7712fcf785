//! Image acquisition: turning user-supplied bytes into an [`ImageAsset`].
//!
//! Format is detected from content rather than trusted from the file name.
//! Only PNG, JPEG and GIF are accepted.

use base64::Engine;
use image::ImageFormat;
use std::path::Path;

use crate::error::ImageError;

/// MIME types the providers accept.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

/// An acquired image, ready to send to a provider.
///
/// `bytes` is never empty and `mime_type` is always one of
/// [`ACCEPTED_MIME_TYPES`]. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    mime_type: String,
    name: String,
}

impl ImageAsset {
    /// Build an asset from raw bytes, sniffing the format from content.
    pub fn from_bytes(bytes: Vec<u8>, name: impl Into<String>) -> Result<Self, ImageError> {
        let name = name.into();
        if bytes.is_empty() {
            return Err(ImageError::Empty { name });
        }

        let format = image::guess_format(&bytes).map_err(|_| ImageError::UnsupportedFormat {
            name: name.clone(),
            format: "unknown".to_string(),
        })?;
        let mime_type = format.to_mime_type();
        if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            return Err(ImageError::UnsupportedFormat {
                name,
                format: format_name(format),
            });
        }

        Ok(Self {
            bytes,
            mime_type: mime_type.to_string(),
            name,
        })
    }

    /// Read an image file asynchronously and build an asset from it.
    ///
    /// `max_size_bytes` is advisory: larger files are accepted with a warning.
    pub async fn load(path: &Path, max_size_bytes: u64) -> Result<Self, ImageError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ImageError::NotFound(path.to_path_buf())
            } else {
                ImageError::Read {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        if bytes.len() as u64 > max_size_bytes {
            tracing::warn!(
                "{} is {:.1} MB, above the recommended {} MB; the provider may reject it",
                path.display(),
                bytes.len() as f64 / (1024.0 * 1024.0),
                max_size_bytes / (1024 * 1024)
            );
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let asset = Self::from_bytes(bytes, name)?;
        tracing::debug!(
            name = %asset.name,
            mime_type = %asset.mime_type,
            size = asset.bytes.len(),
            "Image acquired"
        );
        Ok(asset)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base64 encoding of the bytes, for inline transport.
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// Data URL for OpenAI-style chat APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64())
    }
}

/// Minimal valid headers for tests elsewhere in the crate.
fn format_name(format: ImageFormat) -> String {
    format!("{format:?}").to_lowercase()
}
