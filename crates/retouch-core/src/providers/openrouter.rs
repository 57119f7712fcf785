//! OpenRouter describe provider using the Chat Completions API.
//!
//! Sends the image via data URL in the user message content array.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::provider::{provider_error_from_response, require_key, ImageDescriber};
use crate::asset::ImageAsset;
use crate::config::DescribeProviderConfig;
use crate::error::{ServiceError, ServiceResult};

const PROVIDER: &str = "OpenRouter";

/// Instruction sent alongside every image.
pub const DESCRIBE_PROMPT: &str = "Describe this image in detail, focusing on the main subject, \
     setting, and any notable elements.";

/// OpenRouter provider using Chat Completions.
pub struct OpenRouterDescriber {
    endpoint: String,
    model: String,
    max_tokens: u32,
    referer: String,
    title: String,
    client: reqwest::Client,
}

impl OpenRouterDescriber {
    pub fn new(config: &DescribeProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            referer: config.referer.clone(),
            title: config.title.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn build_request(&self, image: &ImageAsset) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: DESCRIBE_PROMPT.to_string(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract `choices[0].message.content` from a successful response body.
fn parse_response(body: &str) -> ServiceResult<String> {
    let protocol_error = |detail: String| ServiceError::Protocol {
        provider: PROVIDER,
        detail,
    };

    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| protocol_error(format!("response is not valid JSON: {e}")))?;

    response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| protocol_error("missing choices[0].message.content".to_string()))
}

#[async_trait]
impl ImageDescriber for OpenRouterDescriber {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn describe(&self, image: &ImageAsset, key: &str) -> ServiceResult<String> {
        require_key(key, PROVIDER)?;
        let start = Instant::now();

        tracing::debug!(
            model = %self.model,
            image = %image.name(),
            "Sending describe request"
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {key}"))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.title)
            .json(&self.build_request(image))
            .send()
            .await
            .map_err(|e| ServiceError::Provider {
                provider: PROVIDER,
                message: format!("request failed: {e}"),
                status_code: None,
            })?;

        if !resp.status().is_success() {
            return Err(provider_error_from_response(PROVIDER, resp).await);
        }

        let body = resp.text().await.map_err(|e| ServiceError::Provider {
            provider: PROVIDER,
            message: format!("failed to read response: {e}"),
            status_code: None,
        })?;

        let text = parse_response(&body)?;
        tracing::info!(
            chars = text.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Description received"
        );
        Ok(text)
    }
}
