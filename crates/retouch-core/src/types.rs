//! Result types produced by the provider clients.

use serde::Serialize;
use std::path::Path;

/// An edited image returned by the edit provider.
///
/// Always carries image bytes: a response without image data is an error,
/// never an empty `EditedResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditedResult {
    /// Decoded image bytes
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// MIME type reported by the provider
    pub mime_type: String,

    /// Accompanying text from the model, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl EditedResult {
    /// File extension matching the MIME type.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        }
    }

    /// Write the image bytes to `path`.
    pub async fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &self.bytes).await?;
        tracing::info!("Saved edited image to {}", path.display());
        Ok(())
    }
}
