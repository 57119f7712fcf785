//! Wire-level tests for the edit and describe clients against a mock backend.

mod common;

use common::mock_backend::{MockBackend, MockResponse};
use common::{b64, describe_config, edit_config, jpeg_asset, refused_base_url, JPEG};
use retouch_core::providers::DESCRIBE_PROMPT;
use retouch_core::{
    Credentials, GeminiEditor, ImageDescriber, ImageEditor, OpenRouterDescriber, ServiceError,
    Session, SessionState,
};
use std::sync::Arc;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

fn gemini_body(parts: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": parts } }]
    })
    .to_string()
}

// ── Edit client ─────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_sends_image_and_instruction() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(&gemini_body(serde_json::json!([
            { "inlineData": { "data": b64(PNG_BYTES), "mimeType": "image/png" } },
            { "text": "Added a hat as requested" }
        ]))))
        .await;

    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));
    let result = editor
        .edit(&jpeg_asset(), "add a hat", "k1")
        .await
        .unwrap();

    assert_eq!(result.bytes, PNG_BYTES);
    assert_eq!(result.mime_type, "image/png");
    assert_eq!(result.note.as_deref(), Some("Added a hat as requested"));

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.method, "POST");
    assert_eq!(
        req.path,
        "/v1beta/models/gemini-2.5-flash-image-preview:generateContent"
    );
    assert_eq!(req.header("x-goog-api-key"), Some("k1"));

    let body = req.json();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["data"], b64(JPEG));
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[1]["text"], "add a hat");
    assert_eq!(
        body["generationConfig"]["responseModalities"],
        serde_json::json!(["IMAGE", "TEXT"])
    );
}

#[tokio::test]
async fn edit_last_inline_part_wins() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(&gemini_body(serde_json::json!([
            { "inlineData": { "data": b64(b"first"), "mimeType": "image/png" } },
            { "inlineData": { "data": b64(b"second"), "mimeType": "image/webp" } }
        ]))))
        .await;

    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));
    let result = editor.edit(&jpeg_asset(), "x", "k1").await.unwrap();
    assert_eq!(result.bytes, b"second");
    assert_eq!(result.mime_type, "image/webp");
    assert_eq!(result.note, None);
}

#[tokio::test]
async fn edit_refusal_is_provider_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(&gemini_body(serde_json::json!([
            { "text": "I can't help with that." }
        ]))))
        .await;

    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));
    let err = editor.edit(&jpeg_asset(), "x", "k1").await.unwrap_err();
    assert!(
        matches!(err, ServiceError::Provider { status_code: None, .. }),
        "{err:?}"
    );
}

#[tokio::test]
async fn edit_http_error_uses_envelope_message() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error_json(
            400,
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        ))
        .await;

    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));
    let err = editor.edit(&jpeg_asset(), "x", "bad").await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Provider {
            provider: "Gemini",
            message: "API key not valid.".to_string(),
            status_code: Some(400),
        }
    );
}

#[tokio::test]
async fn edit_malformed_success_is_protocol_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#))
        .await;

    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));
    let err = editor.edit(&jpeg_asset(), "x", "k1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Protocol { .. }));
}

#[tokio::test]
async fn edit_empty_key_sends_nothing() {
    let backend = MockBackend::start().await;
    let editor = GeminiEditor::new(&edit_config(&backend.base_url()));

    let err = editor.edit(&jpeg_asset(), "x", "").await.unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));
    assert!(backend.captured_requests().await.is_empty());
}

#[tokio::test]
async fn edit_transport_failure_is_provider_error() {
    let editor = GeminiEditor::new(&edit_config(&refused_base_url().await));
    let err = editor
        .edit(&jpeg_asset(), "add a hat", "k1")
        .await
        .unwrap_err();

    match err {
        ServiceError::Provider {
            provider,
            message,
            status_code: None,
        } => {
            assert_eq!(provider, "Gemini");
            assert!(message.starts_with("request failed"), "{message}");
        }
        other => panic!("expected transport provider error, got {other:?}"),
    }
}

// ── Describe client ─────────────────────────────────────────────────────

#[tokio::test]
async fn describe_sends_attribution_headers_and_data_url() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(
            r#"{"id":"gen-1","choices":[{"message":{"role":"assistant","content":"A red barn in a field."}}]}"#,
        ))
        .await;

    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));
    let text = describer.describe(&jpeg_asset(), "or-key").await.unwrap();
    assert_eq!(text, "A red barn in a field.");

    let requests = backend.captured_requests().await;
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.path, "/api/v1/chat/completions");
    assert_eq!(req.header("authorization"), Some("Bearer or-key"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("http-referer"), Some("http://localhost"));
    assert_eq!(req.header("x-title"), Some("AI Photo Editor"));

    let body = req.json();
    assert_eq!(body["model"], "google/gemini-flash-1.5");
    assert_eq!(body["max_tokens"], 512);
    let content = &body["messages"][0]["content"];
    assert_eq!(content[0]["text"], DESCRIBE_PROMPT);
    assert_eq!(
        content[1]["image_url"]["url"],
        format!("data:image/jpeg;base64,{}", b64(JPEG))
    );
}

#[tokio::test]
async fn describe_401_envelope_message() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error_json(
            401,
            r#"{"error":{"message":"invalid key"}}"#,
        ))
        .await;

    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));
    let err = describer.describe(&jpeg_asset(), "k").await.unwrap_err();
    assert_eq!(
        err,
        ServiceError::Provider {
            provider: "OpenRouter",
            message: "invalid key".to_string(),
            status_code: Some(401),
        }
    );
}

#[tokio::test]
async fn describe_plain_text_error_body() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error_text(502, "upstream timed out"))
        .await;

    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));
    let err = describer.describe(&jpeg_asset(), "k").await.unwrap_err();
    assert_eq!(err.message(), "upstream timed out");
}

#[tokio::test]
async fn describe_empty_error_body_is_generic() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error_text(503, ""))
        .await;

    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));
    let err = describer.describe(&jpeg_asset(), "k").await.unwrap_err();
    assert_eq!(err.message(), "An unknown error occurred.");
}

#[tokio::test]
async fn describe_missing_content_is_protocol_error() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::json(r#"{"choices":[]}"#))
        .await;

    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));
    let err = describer.describe(&jpeg_asset(), "k").await.unwrap_err();
    assert!(matches!(err, ServiceError::Protocol { .. }));
}

#[tokio::test]
async fn describe_empty_key_sends_nothing() {
    let backend = MockBackend::start().await;
    let describer = OpenRouterDescriber::new(&describe_config(&backend.base_url()));

    let err = describer.describe(&jpeg_asset(), "").await.unwrap_err();
    assert!(matches!(err, ServiceError::Config(_)));
    assert!(backend.captured_requests().await.is_empty());
}

// ── Session over real clients ───────────────────────────────────────────

#[tokio::test]
async fn describe_transport_failure_is_provider_error() {
    let describer = OpenRouterDescriber::new(&describe_config(&refused_base_url().await));
    let err = describer.describe(&jpeg_asset(), "k2").await.unwrap_err();

    match err {
        ServiceError::Provider {
            provider,
            message,
            status_code: None,
        } => {
            assert_eq!(provider, "OpenRouter");
            assert!(message.starts_with("request failed"), "{message}");
        }
        other => panic!("expected transport provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn session_runs_both_flights_against_backends() {
    let edit_backend = MockBackend::start().await;
    let describe_backend = MockBackend::start().await;
    edit_backend
        .enqueue_response(MockResponse::json(&gemini_body(serde_json::json!([
            { "inlineData": { "data": b64(PNG_BYTES), "mimeType": "image/png" } }
        ]))))
        .await;
    describe_backend
        .enqueue_response(MockResponse::json(
            r#"{"choices":[{"message":{"content":"A portrait."}}]}"#,
        ))
        .await;

    let mut session = Session::new(
        Credentials::new("k1", "k2"),
        Arc::new(GeminiEditor::new(&edit_config(&edit_backend.base_url()))),
        Arc::new(OpenRouterDescriber::new(&describe_config(
            &describe_backend.base_url(),
        ))),
    );
    session.acquire_image(jpeg_asset());
    session.set_instruction("add a hat");

    let edit = session.begin_edit().unwrap();
    let describe = session.begin_describe().unwrap();
    let (edit_result, describe_result) = tokio::join!(edit.run(), describe.run());
    session.finish_edit(edit_result);
    session.finish_describe(describe_result);

    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.edited().unwrap().bytes, PNG_BYTES);
    assert_eq!(session.description(), Some("A portrait."));
}

#[tokio::test]
async fn session_surfaces_describe_failure() {
    let backend = MockBackend::start().await;
    backend
        .enqueue_response(MockResponse::error_json(
            401,
            r#"{"error":{"message":"invalid key"}}"#,
        ))
        .await;

    let mut session = Session::new(
        Credentials::new("", "k2"),
        Arc::new(GeminiEditor::new(&edit_config(&backend.base_url()))),
        Arc::new(OpenRouterDescriber::new(&describe_config(&backend.base_url()))),
    );
    session.acquire_image(jpeg_asset());
    session.request_describe().await;

    assert_eq!(
        session.state(),
        SessionState::Error("Failed to describe image: OpenRouter API error: invalid key".into())
    );
    session.dismiss_error();
    assert_eq!(session.state(), SessionState::Idle);
}
