mod test_utils;

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use mockito::Matcher;
    use tempfile::TempDir;

    use draftpane::actions::Session;
    use draftpane::core::DraftError;
    use draftpane::email::{DirectorySaver, EmailRecord, FileMailbox, MemoryMailbox};

    use crate::test_utils::{completion_body, test_config};

    fn estate_email() -> EmailRecord {
        EmailRecord {
            subject: Some(String::from("Estate Plan - Smith")),
            sender: String::from("bm@example.com"),
            received_time: None,
            body: String::from(
                "Hi Smith,\n\nGreat to speak today about your estate planning. We'll need to update your will.",
            ),
        }
    }

    #[tokio::test]
    async fn it_drafts_an_estate_planning_reply() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat")
            .match_header("api-key", "test-key")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("Use Template B if the matter involves estate planning".into()),
                Matcher::Regex("Subject: Estate Plan - Smith".into()),
                Matcher::Regex("estate planning. We'll need to update your will.".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(completion_body(
                "DRAFT EMAIL:\n**Subject: Conference - Estate Plan - Smith**\nHi Smith\n\n**Conference**\n\nPlease complete the questionnaire at the following [link](https://mistryfallahi.com.au/client-asset-protection-enquiry/).",
            ))
            .expect(1)
            .create_async()
            .await;

        let endpoint = format!("{}/chat", server.url());
        let session = Session::new(test_config(&endpoint, Some("test-key")));
        let mailbox = MemoryMailbox::new(estate_email());

        let draft = session.generate_response(&mailbox).await?;
        assert!(draft.starts_with("**Subject: Conference - Estate Plan - Smith**\nHi Smith"));
        assert_eq!(session.status(), "Email response generated!");
        assert_eq!(session.response().as_deref(), Some(draft.as_str()));

        let reply = session.reply_with_response(&mailbox).await?;
        assert_eq!(reply.subject.as_deref(), Some("Conference - Estate Plan - Smith"));
        assert!(reply.html_body.contains("<strong>Conference</strong>"));
        assert!(reply.html_body.contains(
            r#"<a href="https://mistryfallahi.com.au/client-asset-protection-enquiry/">link</a>"#
        ));
        assert!(!reply.html_body.contains("**"));
        assert!(!reply.html_body.contains("DRAFT EMAIL:"));

        let forms = mailbox.reply_forms();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].subject, "Conference - Estate Plan - Smith");
        assert_eq!(forms[0].html_body, reply.html_body);

        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_credential_never_calls_the_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server.mock("POST", "/chat").expect(0).create_async().await;

        let endpoint = format!("{}/chat", server.url());
        let session = Session::new(test_config(&endpoint, None));
        let mailbox = MemoryMailbox::new(estate_email());

        let err = session.generate_response(&mailbox).await.unwrap_err();
        assert!(matches!(err, DraftError::CredentialMissing));
        assert_eq!(session.status(), DraftError::CredentialMissing.to_string());
        assert!(session.response().is_none());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_choices_end_the_action() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/chat", server.url());
        let session = Session::new(test_config(&endpoint, Some("test-key")));

        let err = session
            .generate_response(&MemoryMailbox::new(estate_email()))
            .await
            .unwrap_err();
        assert!(matches!(err, DraftError::EmptyResponse));
        assert_eq!(session.status(), "No content in the response from Azure OpenAI.");
    }

    #[tokio::test]
    async fn it_exports_and_replies_from_files() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let message_path = temp_dir.path().join("jones.json");
        std::fs::write(
            &message_path,
            r#"{
                "subject": "Divorce - Jones",
                "sender": "bm@example.com",
                "dateTimeCreated": "2025-03-20T09:00:00Z",
                "body": "Hi Barry, thanks for your time today."
            }"#,
        )?;

        let mut config = test_config("http://127.0.0.1:1/chat", Some("test-key"));
        config.export_path = temp_dir.path().join("exports").display().to_string();
        config.drafts_path = temp_dir.path().join("drafts").display().to_string();

        let mailbox = FileMailbox::open(&message_path, &config.drafts_path).await?;
        let saver = DirectorySaver::new(&config.export_path);
        let session = Session::new(config);

        let filename = session.save_email_as_json(&mailbox, &saver).await?;
        assert!(filename.starts_with("Divorce - Jones_"));
        assert_eq!(session.status(), "Email saved as JSON successfully!");
        let exported: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(saver.path_for(&filename))?)?;
        assert_eq!(exported["bodyContent"], "Hi Barry, thanks for your time today.");
        assert_eq!(exported["receivedTime"], "2025-03-20T09:00:00.000Z");

        session.set_response(Some(String::from(
            "### Analysis:\nClient is Barry.\n### Draft Email:\n**Private and Confidential**\n\nHi Barry",
        )));
        session.reply_with_response(&mailbox).await?;

        let draft_path = mailbox.draft_path().unwrap();
        let form: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(draft_path)?)?;
        assert_eq!(form["subject"], "Conference - Divorce - Jones");
        let html = form["htmlBody"].as_str().unwrap();
        assert!(html.contains("<strong>Private and Confidential</strong><br><br>Hi Barry"));
        assert!(!html.contains("Analysis"));

        Ok(())
    }
}
