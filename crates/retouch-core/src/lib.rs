//! Retouch Core - AI image editing and description clients.
//!
//! Retouch takes an image and a natural-language instruction and forwards them
//! to a generative-image API for an edited image, or sends the image to a
//! vision chat API for a written description.
//!
//! # Architecture
//!
//! ```text
//!                     ┌─> ImageEditor (Gemini)        ─> EditedResult
//! ImageAsset ─> Session
//!                     └─> ImageDescriber (OpenRouter) ─> description
//! ```
//!
//! Credentials live in an external key/value store and are handed to the
//! session explicitly; nothing reads them from ambient state.
//!
//! # Usage
//!
//! ```rust,ignore
//! use retouch_core::{Config, CredentialStore, FileStore, ImageAsset, Session};
//!
//! #[tokio::main]
//! async fn main() -> retouch_core::Result<()> {
//!     let config = Config::load()?;
//!     let store = CredentialStore::new(FileStore::new(config.credentials_path()));
//!     let mut session = Session::from_config(&config, store.load());
//!
//!     let image = ImageAsset::load("./photo.jpg".as_ref(), config.max_file_size_bytes()).await?;
//!     session.acquire_image(image);
//!     session.set_instruction("add a hat");
//!     session.request_edit().await;
//!
//!     if let Some(edited) = session.edited() {
//!         edited.save("./photo-edited.png".as_ref()).await?;
//!     }
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod asset;
pub mod config;
pub mod credentials;
pub mod error;
pub mod providers;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use asset::{ImageAsset, ACCEPTED_MIME_TYPES};
pub use config::Config;
pub use credentials::{CredentialStore, Credentials, FileStore, KeyValueStore, MemoryStore};
pub use error::{
    ConfigError, ImageError, Result, RetouchError, ServiceError, ServiceResult, StorageError,
};
pub use providers::{GeminiEditor, ImageDescriber, ImageEditor, OpenRouterDescriber};
pub use session::{Session, SessionState};
pub use types::EditedResult;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
