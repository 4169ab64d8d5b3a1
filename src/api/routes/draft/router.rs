//! Router for the draft API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json, routing::post};
use chrono::Utc;

use super::public;
use crate::ai::{extract_draft, format_reply, reply_subject};
use crate::api::public::ApiError;
use crate::api::state::AppState;
use crate::email::{EmailRecord, MemoryMailbox, export_email};

type SharedState = Arc<RwLock<AppState>>;

async fn export_handler(
    Json(email): Json<EmailRecord>,
) -> Result<Json<public::ExportResponse>, ApiError> {
    let (filename, bytes) = export_email(&email, Utc::now())?;
    let content = String::from_utf8(bytes)?;
    Ok(Json(public::ExportResponse { filename, content }))
}

async fn generate_handler(
    State(state): State<SharedState>,
    Json(email): Json<EmailRecord>,
) -> Result<Json<public::GenerateResponse>, ApiError> {
    let session = {
        let shared_state = state.read().expect("Unable to read share state");
        Arc::clone(&shared_state.session)
    };

    let mailbox = MemoryMailbox::new(email);
    let response = session.generate_response(&mailbox).await?;
    // The task pane keeps the draft and sends it back to /format, so
    // nothing is left behind in the shared session
    session.set_response(None);

    Ok(Json(public::GenerateResponse {
        response,
        status: session.status(),
    }))
}

async fn format_handler(
    Json(params): Json<public::FormatRequest>,
) -> Result<Json<public::FormatResponse>, ApiError> {
    let draft = extract_draft(&params.response);
    let reply = format_reply(&draft);
    let subject = reply_subject(reply.subject.as_deref(), params.original_subject.as_deref());

    Ok(Json(public::FormatResponse {
        subject,
        html_body: reply.html_body,
    }))
}

/// Create the draft router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/export", post(export_handler))
        .route("/generate", post(generate_handler))
        .route("/format", post(format_handler))
}
