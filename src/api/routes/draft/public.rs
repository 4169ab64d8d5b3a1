//! Public types for the draft API
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct ExportResponse {
    pub filename: String,
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct FormatRequest {
    /// The generated (possibly edited) response
    pub response: String,
    pub original_subject: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct FormatResponse {
    /// Subject to open the reply-all form with
    pub subject: String,
    pub html_body: String,
}
