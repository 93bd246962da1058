//! Shared helpers for ask-ai-service integration tests.
#![allow(dead_code)]

use ask_ai_service::config::{AskAiConfig, GoogleConfig, HttpConfig, ModelConfig, ProviderKind};
use ask_ai_service::services::providers::mock::MockTextProvider;
use ask_ai_service::services::providers::TextProvider;
use ask_ai_service::startup::{build_router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;
use std::sync::Arc;
use tower::ServiceExt;

/// Configuration that never touches the process environment.
pub fn test_config(provider: ProviderKind) -> AskAiConfig {
    AskAiConfig {
        common: service_core::config::Config { port: 0 },
        google: GoogleConfig {
            api_key: Some("test-api-key".to_string()),
        },
        models: ModelConfig {
            provider,
            model: "gemini-2.5-pro".to_string(),
            api_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 5,
        },
        http: HttpConfig {
            max_body_bytes: 20 * 1024 * 1024,
        },
    }
}

/// Router backed by the given mock so tests can inspect recorded calls.
pub fn router_with(provider: Arc<MockTextProvider>) -> Router {
    let text_provider: Arc<dyn TextProvider> = provider;
    build_router(AppState::new(test_config(ProviderKind::Mock), text_provider))
}

pub fn png_data_url(img: DynamicImage) -> String {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("Failed to encode test image");
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

/// POST a raw body to /ask-ai and return the status and parsed JSON body.
pub async fn post_ask(app: Router, body: impl Into<Body>) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ask-ai")
                .header("content-type", "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}
