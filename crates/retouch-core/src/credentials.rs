//! Credential persistence for the two provider API keys.
//!
//! Keys are stored as flat strings under fixed names in an external key/value
//! store. Reads never fail: anything missing or unreadable is an empty key.
//! Writes can fail, and the caller decides how loudly to complain.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StorageError;

/// Store key for the edit provider (Gemini) credential.
pub const EDIT_KEY_NAME: &str = "google_api_key";

/// Store key for the describe provider (OpenRouter) credential.
pub const DESCRIBE_KEY_NAME: &str = "openrouter_api_key";

/// The two provider API keys. Empty means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub edit_key: String,
    pub describe_key: String,
}

impl Credentials {
    pub fn new(edit_key: impl Into<String>, describe_key: impl Into<String>) -> Self {
        Self {
            edit_key: edit_key.into(),
            describe_key: describe_key.into(),
        }
    }

    pub fn has_edit_key(&self) -> bool {
        !self.edit_key.is_empty()
    }

    pub fn has_describe_key(&self) -> bool {
        !self.describe_key.is_empty()
    }
}

/// Mask a key for display, keeping the last four characters.
pub fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(8), tail)
}

/// A process-external string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write several values in one go.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;
}

/// Loads and saves [`Credentials`] through a [`KeyValueStore`].
pub struct CredentialStore<S> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read both keys. Missing keys and read failures come back empty.
    pub fn load(&self) -> Credentials {
        Credentials {
            edit_key: self.read_or_empty(EDIT_KEY_NAME),
            describe_key: self.read_or_empty(DESCRIBE_KEY_NAME),
        }
    }

    /// Persist both keys.
    pub fn save(&self, credentials: &Credentials) -> Result<(), StorageError> {
        self.store.set_many(&[
            (EDIT_KEY_NAME, credentials.edit_key.as_str()),
            (DESCRIBE_KEY_NAME, credentials.describe_key.as_str()),
        ])?;
        tracing::debug!("Credentials saved");
        Ok(())
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_or_empty(&self, key: &str) -> String {
        match self.store.get(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Could not read {key}: {e}");
                String::new()
            }
        }
    }
}

/// TOML file backend.
///
/// Edited with `toml_edit` so comments and unrelated keys survive a save.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<toml_edit::DocumentMut, StorageError> {
        if !self.path.exists() {
            return Ok(toml_edit::DocumentMut::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        content.parse().map_err(|e: toml_edit::TomlError| StorageError::Read {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let doc = self.read_document()?;
        Ok(doc
            .get(key)
            .and_then(|item| item.as_str())
            .map(str::to_string))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        // A corrupt file is replaced rather than blocking the save.
        let mut doc = self.read_document().unwrap_or_default();
        for (key, value) in entries {
            doc[*key] = toml_edit::value(*value);
        }

        let write_err = |e: std::io::Error| StorageError::Write {
            path: self.path.clone(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, doc.to_string()).map_err(write_err)?;
        Ok(())
    }
}

/// In-process backend. Can be switched to refuse writes, which stands in for
/// a full or disabled store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail.
    pub fn read_only() -> Self {
        Self {
            values: Mutex::default(),
            read_only: true,
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Unavailable("store is read-only".into()));
        }
        let mut values = self
            .values
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store poisoned".into()))?;
        for (key, value) in entries {
            values.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }
}
