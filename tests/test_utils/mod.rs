//! Test utilities for integration tests
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{Router, body::Body};

use draftpane::api::AppState;
use draftpane::api::app;
use draftpane::core::{AppConfig, RuntimeEnv};

/// Config pointing the completion client at `endpoint`, with nothing
/// read from the process environment.
pub fn test_config(endpoint: &str, api_key: Option<&str>) -> AppConfig {
    let mut config = AppConfig::resolve(RuntimeEnv::default(), |_| None);
    config.openai_endpoint = endpoint.to_string();
    config.openai_api_key = api_key.map(String::from);
    config.request_timeout = Duration::from_secs(5);
    config
}

/// Creates a test application router backed by `config`.
pub fn test_app(config: AppConfig) -> Router {
    let app_state = AppState::new(config);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body was not utf-8")
}

/// A chat completion response whose first choice is `content`.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
