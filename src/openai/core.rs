use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::{DraftError, SamplingParams};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// A single chat completion request. Built once per invocation by the
/// prompt builder and never modified afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
}

impl CompletionRequest {
    pub fn new(system_prompt: &str, user_prompt: &str, sampling: &SamplingParams) -> Self {
        Self {
            system_prompt: system_prompt.to_string(),
            user_prompt: user_prompt.to_string(),
            max_tokens: sampling.max_tokens,
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::new(Role::System, &self.system_prompt),
            Message::new(Role::User, &self.user_prompt),
        ]
    }

    /// JSON body for the chat completions endpoint.
    pub fn payload(&self) -> Value {
        json!({
            "messages": self.messages(),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "top_p": self.top_p,
            "frequency_penalty": self.frequency_penalty,
            "presence_penalty": self.presence_penalty,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CompletionResult {
    pub raw_text: String,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

/// Pull a human readable message out of a non-2xx response body.
fn error_message(status: StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown status");
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: Some(ErrorBody {
                message: Some(message),
            }),
        }) => message,
        Ok(_) => reason.to_string(),
        Err(_) if body.trim().is_empty() => format!("{} {}", status.as_u16(), reason),
        Err(_) => body.to_string(),
    }
}

/// Send the request to the chat completions endpoint and return the
/// first choice's content. Makes at most one request and never
/// retries.
pub async fn completion(
    request: &CompletionRequest,
    endpoint: &str,
    api_key: Option<&str>,
    timeout: Duration,
) -> Result<CompletionResult, DraftError> {
    let api_key = api_key.ok_or(DraftError::CredentialMissing)?;

    let payload = request.payload();
    tracing::debug!("Endpoint URL: {}", endpoint);
    tracing::debug!(
        "Request payload: {}...",
        payload.to_string().chars().take(200).collect::<String>()
    );

    let response = reqwest::Client::new()
        .post(endpoint)
        .header("api-key", api_key)
        .header("Content-Type", "application/json")
        .timeout(timeout)
        .json(&payload)
        .send()
        .await
        .map_err(|e| DraftError::NetworkError(e.to_string()))?;

    let status = response.status();
    tracing::debug!("Response status: {}", status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Error response: {}", body);
        return Err(DraftError::HttpError {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    let data: CompletionResponse = response
        .json()
        .await
        .map_err(|e| DraftError::NetworkError(e.to_string()))?;

    let content = data
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(DraftError::EmptyResponse)?;

    Ok(CompletionResult {
        raw_text: content.trim().to_string(),
    })
}
