//! Public API types

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::json;

use crate::core::DraftError;

// Errors

pub struct ApiError(anyhow::Error);

fn status_for(err: &DraftError) -> StatusCode {
    match err {
        DraftError::NoItemSelected | DraftError::NoResponse => StatusCode::NOT_FOUND,
        DraftError::ActionInProgress(_) => StatusCode::CONFLICT,
        DraftError::CredentialMissing => StatusCode::PRECONDITION_FAILED,
        DraftError::NetworkError(_)
        | DraftError::HttpError { .. }
        | DraftError::EmptyResponse => StatusCode::BAD_GATEWAY,
        DraftError::BodyFetchError(_)
        | DraftError::ComposeError(_)
        | DraftError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert `ApiError` into an Axum compatible response. Draft errors
/// keep their status line and kind so the task pane can show them.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        match self.0.downcast_ref::<DraftError>() {
            Some(err) => (
                status_for(err),
                Json(json!({"error": err.to_string(), "kind": err.kind()})),
            )
                .into_response(),
            None => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Something went wrong: {}", self.0),
                    "kind": "internal",
                })),
            )
                .into_response(),
        }
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod draft {
    pub use crate::api::routes::draft::public::*;
}
