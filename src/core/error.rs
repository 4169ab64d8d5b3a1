/// Everything that can end a user action. The `Display` text is the
/// status line shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("No email selected")]
    NoItemSelected,

    #[error("Error getting email body: {0}")]
    BodyFetchError(String),

    #[error("Azure OpenAI API key not configured. Set AZURE_OPENAI_API_KEY or add it to the runtime config.")]
    CredentialMissing,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Error generating legal response: {message}")]
    HttpError { status: u16, message: String },

    #[error("No content in the response from Azure OpenAI.")]
    EmptyResponse,

    #[error("Error creating reply: {0}")]
    ComposeError(String),

    #[error("No response generated yet.")]
    NoResponse,

    #[error("Error saving email: {0}")]
    ExportError(String),

    #[error("Already busy with {0}, try again when it finishes.")]
    ActionInProgress(&'static str),
}

impl DraftError {
    pub fn kind(&self) -> &'static str {
        match self {
            DraftError::NoItemSelected => "no_item_selected",
            DraftError::BodyFetchError(_) => "body_fetch_error",
            DraftError::CredentialMissing => "credential_missing",
            DraftError::NetworkError(_) => "network_error",
            DraftError::HttpError { .. } => "http_error",
            DraftError::EmptyResponse => "empty_response",
            DraftError::ComposeError(_) => "compose_error",
            DraftError::NoResponse => "no_response",
            DraftError::ExportError(_) => "export_error",
            DraftError::ActionInProgress(_) => "action_in_progress",
        }
    }
}

/// Failure reported by the host mailbox.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
