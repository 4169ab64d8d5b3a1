//! The three user actions: save the open email as JSON, generate a
//! draft response and reply-all with it.
//!
//! Every action ends with a single status line, whether it succeeded or
//! not, and errors never escape past the action that raised them. The
//! status and the last generated response are last-write-wins. Each
//! action is single-flight, triggering one while it is already running
//! fails immediately with `DraftError::ActionInProgress`.
use std::future::Future;
use std::sync::RwLock;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::ai::{FormattedReply, ServiceType, Templates, build_request, extract_draft, format_reply};
use crate::core::{AppConfig, DraftError};
use crate::email::{FileSaver, Mailbox, compose_reply, export_email, extract_email};
use crate::openai::completion;

pub struct Session {
    config: AppConfig,
    templates: Templates,
    status: RwLock<String>,
    response: RwLock<Option<String>>,
    save_lock: Mutex<()>,
    generate_lock: Mutex<()>,
    reply_lock: Mutex<()>,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            templates: Templates::default(),
            status: RwLock::new(String::new()),
            response: RwLock::new(None),
            save_lock: Mutex::new(()),
            generate_lock: Mutex::new(()),
            reply_lock: Mutex::new(()),
        }
    }

    pub fn with_templates(mut self, templates: Templates) -> Self {
        self.templates = templates;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The latest status line.
    pub fn status(&self) -> String {
        self.status.read().map(|s| s.clone()).unwrap_or_default()
    }

    /// The latest generated response, if any.
    pub fn response(&self) -> Option<String> {
        self.response.read().ok().and_then(|r| r.clone())
    }

    /// Replace the current response, e.g. with one edited by the user.
    pub fn set_response(&self, response: Option<String>) {
        if let Ok(mut current) = self.response.write() {
            *current = response;
        }
    }

    fn set_status(&self, status: &str) {
        tracing::info!("{}", status);
        if let Ok(mut current) = self.status.write() {
            *current = status.to_string();
        }
    }

    /// Run `action` holding `lock`, reducing the outcome to a status
    /// line.
    async fn run<T, F>(
        &self,
        name: &'static str,
        lock: &Mutex<()>,
        success: &str,
        action: F,
    ) -> Result<T, DraftError>
    where
        F: Future<Output = Result<T, DraftError>>,
    {
        let Ok(_guard) = lock.try_lock() else {
            let err = DraftError::ActionInProgress(name);
            tracing::warn!("{}", err);
            return Err(err);
        };

        match action.await {
            Ok(value) => {
                self.set_status(success);
                Ok(value)
            }
            Err(e) => {
                tracing::error!("{} failed: {:?}", name, e);
                self.set_status(&e.to_string());
                Err(e)
            }
        }
    }

    /// Save the open email as a JSON file. Returns the filename.
    pub async fn save_email_as_json(
        &self,
        mailbox: &dyn Mailbox,
        saver: &dyn FileSaver,
    ) -> Result<String, DraftError> {
        self.run(
            "save",
            &self.save_lock,
            "Email saved as JSON successfully!",
            async {
                self.set_status("Processing...");
                let email = extract_email(mailbox).await?;
                let (filename, bytes) = export_email(&email, Utc::now())?;
                saver.save(&bytes, &filename).await?;
                Ok(filename)
            },
        )
        .await
    }

    /// Ask the model for a draft follow-up to the open email.
    pub async fn generate_response(&self, mailbox: &dyn Mailbox) -> Result<String, DraftError> {
        self.run(
            "generate",
            &self.generate_lock,
            "Email response generated!",
            async {
                self.set_status("Preparing to send to Azure OpenAI...");
                self.set_response(None);

                let email = extract_email(mailbox).await?;
                self.set_status("Processing email content...");

                let service_type = ServiceType::classify(&email);
                tracing::debug!(
                    "Keywords suggest {} ({:?})",
                    service_type.template_name(),
                    service_type
                );

                let request = build_request(
                    &email,
                    &self.config.meeting_options,
                    &self.templates,
                    &self.config.sampling,
                );

                if self.config.openai_api_key.is_none() {
                    return Err(DraftError::CredentialMissing);
                }
                self.set_status("Generating AI response...");
                let result = completion(
                    &request,
                    &self.config.openai_endpoint,
                    self.config.openai_api_key.as_deref(),
                    self.config.request_timeout,
                )
                .await?;

                let draft = extract_draft(&result.raw_text);
                self.set_response(Some(draft.clone()));
                Ok(draft)
            },
        )
        .await
    }

    /// Open a reply-all draft with the last generated response.
    pub async fn reply_with_response(
        &self,
        mailbox: &dyn Mailbox,
    ) -> Result<FormattedReply, DraftError> {
        self.run(
            "reply",
            &self.reply_lock,
            "Reply All created with formatted response. The subject line is at the top of the email for easy copying.",
            async {
                self.set_status("Creating reply all...");
                let response = self
                    .response()
                    .filter(|r| !r.trim().is_empty())
                    .ok_or(DraftError::NoResponse)?;

                // The response may have been edited or supplied by hand
                let draft = extract_draft(&response);
                let reply = format_reply(&draft);
                let subject = compose_reply(mailbox, &reply).await?;
                tracing::debug!("Opened reply all with subject {}", subject);
                Ok(reply)
            },
        )
        .await
    }
}
