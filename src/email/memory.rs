//! In-memory mailbox holding a single message. Used by the HTTP API,
//! where the task pane posts the open message, and in tests.
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::host::{MailItem, Mailbox};
use super::models::{EmailRecord, ReplyAllForm};
use crate::core::HostError;

pub struct MemoryItem {
    record: EmailRecord,
    body_error: Option<String>,
    reply_error: Option<String>,
    reply_forms: Mutex<Vec<ReplyAllForm>>,
}

#[async_trait]
impl MailItem for MemoryItem {
    fn subject(&self) -> Option<String> {
        self.record.subject.clone()
    }

    fn sender(&self) -> Option<String> {
        Some(self.record.sender.clone())
    }

    fn date_time_created(&self) -> Option<DateTime<Utc>> {
        self.record.received_time
    }

    async fn body_as_text(&self) -> Result<String, HostError> {
        match &self.body_error {
            Some(msg) => Err(HostError::new(msg.as_str())),
            None => Ok(self.record.body.clone()),
        }
    }

    async fn open_reply_all_form(&self, form: ReplyAllForm) -> Result<(), HostError> {
        if let Some(msg) = &self.reply_error {
            return Err(HostError::new(msg.as_str()));
        }
        self.reply_forms
            .lock()
            .map_err(|_| HostError::new("Reply form store poisoned"))?
            .push(form);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryMailbox {
    item: Option<MemoryItem>,
}

impl MemoryMailbox {
    pub fn new(record: EmailRecord) -> Self {
        Self {
            item: Some(MemoryItem {
                record,
                body_error: None,
                reply_error: None,
                reply_forms: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A mailbox with no message open.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Make body fetches fail with `msg`.
    pub fn fail_body(mut self, msg: &str) -> Self {
        if let Some(item) = self.item.as_mut() {
            item.body_error = Some(msg.to_string());
        }
        self
    }

    /// Make the host reject reply-all forms with `msg`.
    pub fn fail_reply(mut self, msg: &str) -> Self {
        if let Some(item) = self.item.as_mut() {
            item.reply_error = Some(msg.to_string());
        }
        self
    }

    /// Reply-all forms opened so far.
    pub fn reply_forms(&self) -> Vec<ReplyAllForm> {
        self.item
            .as_ref()
            .and_then(|item| item.reply_forms.lock().ok().map(|forms| forms.clone()))
            .unwrap_or_default()
    }
}

impl Mailbox for MemoryMailbox {
    fn active_item(&self) -> Option<&dyn MailItem> {
        self.item.as_ref().map(|item| item as &dyn MailItem)
    }
}
