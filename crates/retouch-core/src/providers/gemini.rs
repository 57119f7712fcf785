//! Gemini image edit provider using the `generateContent` API.
//!
//! Sends the image as an inline-data part followed by the instruction, and
//! asks for both image and text back.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::provider::{provider_error_from_response, require_key, ImageEditor};
use crate::asset::ImageAsset;
use crate::config::EditProviderConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::types::EditedResult;

const PROVIDER: &str = "Gemini";

/// Gemini edit provider.
pub struct GeminiEditor {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiEditor {
    pub fn new(config: &EditProviderConfig) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        let model = self.model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!("{}/{}:generateContent", self.endpoint, model_path)
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    data: String,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
    #[serde(default)]
    text: Option<String>,
}

fn protocol_error(detail: impl Into<String>) -> ServiceError {
    ServiceError::Protocol {
        provider: PROVIDER,
        detail: detail.into(),
    }
}

/// Build the `generateContent` body for one image and instruction.
fn build_request(image: &ImageAsset, instruction: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::InlineData {
                    inline_data: InlineData {
                        data: image.base64(),
                        mime_type: Some(image.mime_type().to_string()),
                    },
                },
                RequestPart::Text {
                    text: instruction.to_string(),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE", "TEXT"],
        },
    }
}

/// Parse a successful `generateContent` body into an [`EditedResult`].
fn parse_response(body: &str) -> ServiceResult<EditedResult> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| protocol_error(format!("response is not valid JSON: {e}")))?;

    let parts = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .ok_or_else(|| protocol_error("missing candidates[0].content.parts"))?;

    collect_parts(parts)
}

/// Single pass over the parts; the last image and the last text win.
fn collect_parts(parts: Vec<ResponsePart>) -> ServiceResult<EditedResult> {
    let (latest_image, latest_note) =
        parts
            .into_iter()
            .fold((None, None), |(latest_image, latest_note), part| {
                match (part.inline_data, part.text) {
                    (Some(inline), _) if !inline.data.is_empty() => (Some(inline), latest_note),
                    (_, Some(text)) if !text.is_empty() => (latest_image, Some(text)),
                    _ => (latest_image, latest_note),
                }
            });

    let Some(image) = latest_image else {
        return Err(ServiceError::Provider {
            provider: PROVIDER,
            message: "API did not return an image. It might have refused the request."
                .to_string(),
            status_code: None,
        });
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(image.data.as_bytes())
        .map_err(|e| protocol_error(format!("image data is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(protocol_error("image data is empty"));
    }

    Ok(EditedResult {
        bytes,
        mime_type: image.mime_type.unwrap_or_else(|| "image/png".to_string()),
        note: latest_note,
    })
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn edit(
        &self,
        image: &ImageAsset,
        instruction: &str,
        key: &str,
    ) -> ServiceResult<EditedResult> {
        require_key(key, "Google Gemini")?;
        let start = Instant::now();

        tracing::debug!(
            model = %self.model,
            image = %image.name(),
            "Sending edit request"
        );

        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key)
            .json(&build_request(image, instruction))
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

        let result = parse_response(&body)?;
        tracing::info!(
            mime_type = %result.mime_type,
            size = result.bytes.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Edited image received"
        );
        Ok(result)
    }
}
