//! The editing session: one image, one instruction, and the results derived
//! from them.
//!
//! Edit and describe requests are split into a `begin_*` step that checks the
//! guards and hands back a self-contained flight, and a `finish_*` step that
//! writes the outcome. Flights hold no borrow of the session, so an edit and a
//! describe can be awaited together on one task. The session does not stop a
//! second flight of the same kind; callers disable their own trigger while one
//! is outstanding. A finished flight always writes its slot, even if the image
//! was cleared or replaced in the meantime.

use std::sync::Arc;

use crate::asset::ImageAsset;
use crate::config::Config;
use crate::credentials::{CredentialStore, Credentials, KeyValueStore};
use crate::error::{ServiceResult, StorageError};
use crate::providers::{GeminiEditor, ImageDescriber, ImageEditor, OpenRouterDescriber};
use crate::types::EditedResult;

pub const MISSING_IMAGE_OR_PROMPT: &str = "Please upload an image and enter a prompt.";
pub const MISSING_IMAGE: &str = "Please upload an image first.";
pub const MISSING_EDIT_KEY: &str = "Please set your Google Gemini API key in the settings.";
pub const MISSING_DESCRIBE_KEY: &str = "Please set your OpenRouter API key in the settings.";
pub const KEYS_NOT_SAVED: &str =
    "Could not save API keys to the credential store. They will be lost on restart.";

/// What the session is doing, as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No image acquired.
    NoImage,
    /// Image present, nothing in flight, no error.
    Idle,
    /// At least one request is outstanding.
    Busy { editing: bool, describing: bool },
    /// The latest error, until dismissed or replaced.
    Error(String),
}

/// An edit request ready to send.
pub struct EditFlight {
    editor: Arc<dyn ImageEditor>,
    image: ImageAsset,
    instruction: String,
    key: String,
}

impl EditFlight {
    pub async fn run(self) -> ServiceResult<EditedResult> {
        tracing::debug!(provider = self.editor.name(), "Sending edit request");
        self.editor
            .edit(&self.image, &self.instruction, &self.key)
            .await
    }
}

/// A describe request ready to send.
pub struct DescribeFlight {
    describer: Arc<dyn ImageDescriber>,
    image: ImageAsset,
    key: String,
}

impl DescribeFlight {
    pub async fn run(self) -> ServiceResult<String> {
        tracing::debug!(provider = self.describer.name(), "Sending describe request");
        self.describer.describe(&self.image, &self.key).await
    }
}

/// Application-level controller for one editing session.
pub struct Session {
    credentials: Credentials,
    editor: Arc<dyn ImageEditor>,
    describer: Arc<dyn ImageDescriber>,
    image: Option<ImageAsset>,
    instruction: String,
    edited: Option<EditedResult>,
    description: Option<String>,
    error: Option<String>,
    editing: bool,
    describing: bool,
    settings_requested: bool,
}

impl Session {
    pub fn new(
        credentials: Credentials,
        editor: Arc<dyn ImageEditor>,
        describer: Arc<dyn ImageDescriber>,
    ) -> Self {
        Self {
            credentials,
            editor,
            describer,
            image: None,
            instruction: String::new(),
            edited: None,
            description: None,
            error: None,
            editing: false,
            describing: false,
            settings_requested: false,
        }
    }

    /// Build a session wired to the configured Gemini and OpenRouter clients.
    pub fn from_config(config: &Config, credentials: Credentials) -> Self {
        Self::new(
            credentials,
            Arc::new(GeminiEditor::new(&config.providers.edit)),
            Arc::new(OpenRouterDescriber::new(&config.providers.describe)),
        )
    }

    // --- Credentials ---

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Adopt new credentials in memory.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Adopt new credentials, then persist them.
    ///
    /// The in-memory values change even when persistence fails; in that case
    /// the error banner warns that the keys will not survive a restart.
    pub fn save_credentials<S: KeyValueStore>(
        &mut self,
        credentials: Credentials,
        store: &CredentialStore<S>,
    ) -> Result<(), StorageError> {
        self.set_credentials(credentials);
        self.settings_requested = false;
        store.save(&self.credentials).map_err(|e| {
            tracing::warn!("Failed to persist credentials: {e}");
            self.error = Some(KEYS_NOT_SAVED.to_string());
            e
        })
    }

    /// True once after a request was refused for lack of a key.
    pub fn take_settings_request(&mut self) -> bool {
        std::mem::take(&mut self.settings_requested)
    }

    // --- Inputs ---

    /// Replace the image. Everything derived from the previous one is dropped.
    pub fn acquire_image(&mut self, image: ImageAsset) {
        tracing::debug!(name = %image.name(), "New image in session");
        self.image = Some(image);
        self.edited = None;
        self.description = None;
        self.error = None;
    }

    pub fn set_instruction(&mut self, instruction: impl Into<String>) {
        self.instruction = instruction.into();
    }

    // --- Edit ---

    /// Check the edit guards and start a flight.
    ///
    /// Returns `None` when a guard fails; the session is then in the error
    /// state and no request should be sent.
    pub fn begin_edit(&mut self) -> Option<EditFlight> {
        let image = match &self.image {
            Some(image) if !self.instruction.trim().is_empty() => image.clone(),
            _ => {
                self.error = Some(MISSING_IMAGE_OR_PROMPT.to_string());
                return None;
            }
        };
        if !self.credentials.has_edit_key() {
            self.error = Some(MISSING_EDIT_KEY.to_string());
            self.settings_requested = true;
            return None;
        }

        self.editing = true;
        self.error = None;
        self.edited = None;
        self.description = None;

        Some(EditFlight {
            editor: Arc::clone(&self.editor),
            image,
            instruction: self.instruction.clone(),
            key: self.credentials.edit_key.clone(),
        })
    }

    /// Record the outcome of an edit flight.
    pub fn finish_edit(&mut self, result: ServiceResult<EditedResult>) {
        self.editing = false;
        match result {
            Ok(edited) => self.edited = Some(edited),
            Err(e) => {
                tracing::error!("Edit failed: {e}");
                self.edited = None;
                self.error = Some(format!("Failed to edit image: {e}"));
            }
        }
    }

    /// Guard, send and record one edit request.
    pub async fn request_edit(&mut self) {
        if let Some(flight) = self.begin_edit() {
            let result = flight.run().await;
            self.finish_edit(result);
        }
    }

    // --- Describe ---

    /// Check the describe guards and start a flight.
    pub fn begin_describe(&mut self) -> Option<DescribeFlight> {
        let Some(image) = self.image.clone() else {
            self.error = Some(MISSING_IMAGE.to_string());
            return None;
        };
        if !self.credentials.has_describe_key() {
            self.error = Some(MISSING_DESCRIBE_KEY.to_string());
            self.settings_requested = true;
            return None;
        }

        self.describing = true;
        self.error = None;
        self.description = None;

        Some(DescribeFlight {
            describer: Arc::clone(&self.describer),
            image,
            key: self.credentials.describe_key.clone(),
        })
    }

    /// Record the outcome of a describe flight.
    pub fn finish_describe(&mut self, result: ServiceResult<String>) {
        self.describing = false;
        match result {
            Ok(text) => self.description = Some(text),
            Err(e) => {
                tracing::error!("Describe failed: {e}");
                self.description = None;
                self.error = Some(format!("Failed to describe image: {e}"));
            }
        }
    }

    /// Guard, send and record one describe request.
    pub async fn request_describe(&mut self) {
        if let Some(flight) = self.begin_describe() {
            let result = flight.run().await;
            self.finish_describe(result);
        }
    }

    // --- Reset ---

    /// Drop the image, both results, the error and the instruction.
    pub fn clear(&mut self) {
        self.image = None;
        self.edited = None;
        self.description = None;
        self.error = None;
        self.instruction.clear();
    }

    /// Acknowledge the current error.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // --- Views ---

    pub fn state(&self) -> SessionState {
        if self.image.is_none() {
            return SessionState::NoImage;
        }
        if let Some(message) = &self.error {
            return SessionState::Error(message.clone());
        }
        if self.editing || self.describing {
            return SessionState::Busy {
                editing: self.editing,
                describing: self.describing,
            };
        }
        SessionState::Idle
    }

    pub fn image(&self) -> Option<&ImageAsset> {
        self.image.as_ref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn edited(&self) -> Option<&EditedResult> {
        self.edited.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_describing(&self) -> bool {
        self.describing
    }
}
