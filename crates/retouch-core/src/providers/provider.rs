//! Provider traits and shared HTTP error handling.
//!
//! The session talks to the edit and describe services only through these
//! traits, so tests can drive it with mock clients.

use async_trait::async_trait;

use crate::asset::ImageAsset;
use crate::error::{ServiceError, ServiceResult};
use crate::types::EditedResult;

/// A service that edits an image according to a text instruction.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the session holds an `Arc<dyn ImageEditor>`).
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Send one edit request. An empty `key` fails before any network call.
    async fn edit(
        &self,
        image: &ImageAsset,
        instruction: &str,
        key: &str,
    ) -> ServiceResult<EditedResult>;
}

/// A service that describes an image in prose.
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &'static str;

    /// Send one describe request. An empty `key` fails before any network call.
    async fn describe(&self, image: &ImageAsset, key: &str) -> ServiceResult<String>;
}

/// Fallback when an error response carries nothing usable.
pub(crate) const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Reject an empty credential.
pub(crate) fn require_key(key: &str, provider: &str) -> ServiceResult<()> {
    if key.is_empty() {
        return Err(ServiceError::Config(format!(
            "{provider} API key not provided."
        )));
    }
    Ok(())
}

/// Pull a human-readable message out of an error response body.
///
/// Priority: `error.message` from a JSON envelope, then the serialized
/// `error` value, then a bare JSON string body, then the raw body text,
/// then a generic message.
pub(crate) fn error_message_from_body(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(text) = value.as_str() {
            return text.to_string();
        }
        if let Some(error) = value.get("error") {
            if let Some(message) = error.get("message").and_then(|m| m.as_str()) {
                return message.to_string();
            }
            if let Some(text) = error.as_str() {
                return text.to_string();
            }
            if !error.is_null() {
                return error.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Turn a non-success HTTP response into a provider error.
pub(crate) async fn provider_error_from_response(
    provider: &'static str,
    resp: reqwest::Response,
) -> ServiceError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = error_message_from_body(&body);
    tracing::debug!("{provider} HTTP {status}: {body}");
    ServiceError::Provider {
        provider,
        message,
        status_code: Some(status.as_u16()),
    }
}
