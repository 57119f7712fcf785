//! Remote AI providers.
//!
//! Two independent services sit behind small traits: an image editor (Gemini)
//! and an image describer (OpenRouter). Each call is a single request with no
//! retry and no caching.

pub(crate) mod gemini;
pub(crate) mod openrouter;
pub(crate) mod provider;

pub use gemini::GeminiEditor;
pub use openrouter::{OpenRouterDescriber, DESCRIBE_PROMPT};
pub use provider::{ImageDescriber, ImageEditor};
