//! A mailbox backed by a message saved as JSON on disk, for driving
//! the pipeline from the command line. Reply-all forms are written to
//! a drafts directory instead of opening a compose window.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use htmd::HtmlToMarkdown;
use serde::Deserialize;

use super::host::{MailItem, Mailbox};
use super::models::ReplyAllForm;
use crate::core::HostError;

/// Message as the host hands it over. Either `body` or `htmlBody` is
/// set depending on the message format.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    pub subject: Option<String>,
    pub sender: Option<String>,
    pub date_time_created: Option<DateTime<Utc>>,
    pub body: Option<String>,
    pub html_body: Option<String>,
}

pub struct FileMessage {
    path: PathBuf,
    drafts_path: PathBuf,
    message: StoredMessage,
}

impl FileMessage {
    fn draft_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| String::from("message"));
        self.drafts_path.join(format!("{}.reply.json", stem))
    }
}

#[async_trait]
impl MailItem for FileMessage {
    fn subject(&self) -> Option<String> {
        self.message.subject.clone()
    }

    fn sender(&self) -> Option<String> {
        self.message.sender.clone()
    }

    fn date_time_created(&self) -> Option<DateTime<Utc>> {
        self.message.date_time_created
    }

    async fn body_as_text(&self) -> Result<String, HostError> {
        if let Some(body) = &self.message.body {
            return Ok(body.clone());
        }
        match &self.message.html_body {
            Some(html) => {
                let converter = HtmlToMarkdown::builder()
                    .skip_tags(vec!["script", "style", "img", "svg"])
                    .build();
                converter
                    .convert(html)
                    .map(|text| text.trim().to_string())
                    .map_err(|e| HostError::new(format!("Failed to convert HTML body: {}", e)))
            }
            None => Ok(String::new()),
        }
    }

    async fn open_reply_all_form(&self, form: ReplyAllForm) -> Result<(), HostError> {
        let json = serde_json::to_string_pretty(&form).map_err(|e| HostError::new(e.to_string()))?;
        tokio::fs::create_dir_all(&self.drafts_path)
            .await
            .map_err(|e| HostError::new(e.to_string()))?;
        let path = self.draft_path();
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| HostError::new(e.to_string()))?;
        tracing::info!("Wrote reply-all draft to {}", path.display());
        Ok(())
    }
}

#[derive(Default)]
pub struct FileMailbox {
    item: Option<FileMessage>,
}

impl FileMailbox {
    /// Open the message at `path`. A missing file means no message is
    /// selected rather than an error.
    pub async fn open(path: impl AsRef<Path>, drafts_path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::warn!("No message at {}", path.display());
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read message {}", path.display()))?;
        let message: StoredMessage = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse message {}", path.display()))?;

        Ok(Self {
            item: Some(FileMessage {
                path: path.to_path_buf(),
                drafts_path: drafts_path.as_ref().to_path_buf(),
                message,
            }),
        })
    }

    /// Where a reply-all form for the open message gets written.
    pub fn draft_path(&self) -> Option<PathBuf> {
        self.item.as_ref().map(FileMessage::draft_path)
    }
}

impl Mailbox for FileMailbox {
    fn active_item(&self) -> Option<&dyn MailItem> {
        self.item.as_ref().map(|item| item as &dyn MailItem)
    }
}
