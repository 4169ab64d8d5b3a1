use std::path::Path;

use anyhow::{Context, Result};

use crate::actions::Session;
use crate::core::AppConfig;
use crate::email::FileMailbox;

pub async fn run(message: &Path, response: &Path, config: AppConfig) -> Result<()> {
    let mailbox = FileMailbox::open(message, &config.drafts_path).await?;
    let response = tokio::fs::read_to_string(response)
        .await
        .with_context(|| format!("Failed to read response {}", response.display()))?;

    let session = Session::new(config);
    session.set_response(Some(response));

    let result = session.reply_with_response(&mailbox).await;
    eprintln!("{}", session.status());
    result?;
    if let Some(path) = mailbox.draft_path() {
        println!("{}", path.display());
    }

    Ok(())
}
