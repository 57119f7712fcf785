//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_backend;

use base64::Engine;
use retouch_core::config::{DescribeProviderConfig, EditProviderConfig};
use retouch_core::ImageAsset;

/// Smallest byte sequence that sniffs as JPEG.
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F', 0];

pub fn jpeg_asset() -> ImageAsset {
    ImageAsset::from_bytes(JPEG.to_vec(), "photo.jpg").expect("fixture should sniff as JPEG")
}

pub fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Edit provider config pointing at a mock backend.
pub fn edit_config(base_url: &str) -> EditProviderConfig {
    EditProviderConfig {
        endpoint: format!("{base_url}/v1beta"),
        model: "gemini-2.5-flash-image-preview".to_string(),
    }
}

/// Describe provider config pointing at a mock backend.
pub fn describe_config(base_url: &str) -> DescribeProviderConfig {
    DescribeProviderConfig {
        endpoint: format!("{base_url}/api/v1/chat/completions"),
        ..DescribeProviderConfig::default()
    }
}

/// Base URL of a local port with nothing listening on it.
pub async fn refused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
