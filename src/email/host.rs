use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{EmailRecord, ReplyAllForm};
use crate::ai::format::{FormattedReply, reply_subject};
use crate::core::{DraftError, HostError};

/// A message open in the host mail client.
#[async_trait]
pub trait MailItem: Send + Sync {
    fn subject(&self) -> Option<String>;
    fn sender(&self) -> Option<String>;
    fn date_time_created(&self) -> Option<DateTime<Utc>>;
    /// Fetch the body coerced to plain text.
    async fn body_as_text(&self) -> Result<String, HostError>;
    async fn open_reply_all_form(&self, form: ReplyAllForm) -> Result<(), HostError>;
}

/// The host mailbox. Only ever exposes the currently open item.
pub trait Mailbox: Send + Sync {
    fn active_item(&self) -> Option<&dyn MailItem>;
}

/// Read the active message into an `EmailRecord`.
pub async fn extract_email(mailbox: &dyn Mailbox) -> Result<EmailRecord, DraftError> {
    let item = mailbox.active_item().ok_or(DraftError::NoItemSelected)?;

    let body = item
        .body_as_text()
        .await
        .map_err(|e| DraftError::BodyFetchError(e.message))?;

    Ok(EmailRecord {
        subject: item.subject(),
        sender: item.sender().unwrap_or_else(|| String::from("Unknown")),
        received_time: item.date_time_created(),
        body,
    })
}

/// Open a reply-all draft for the active message. Returns the subject
/// the draft was opened with.
pub async fn compose_reply(
    mailbox: &dyn Mailbox,
    reply: &FormattedReply,
) -> Result<String, DraftError> {
    let item = mailbox.active_item().ok_or(DraftError::NoItemSelected)?;
    let subject = reply_subject(reply.subject.as_deref(), item.subject().as_deref());

    // The host may still add a "Re: " prefix
    item.open_reply_all_form(ReplyAllForm {
        html_body: reply.html_body.clone(),
        subject: subject.clone(),
    })
    .await
    .map_err(|e| DraftError::ComposeError(e.message))?;

    Ok(subject)
}
