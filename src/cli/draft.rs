use std::path::Path;

use anyhow::Result;

use crate::actions::Session;
use crate::core::AppConfig;
use crate::email::FileMailbox;

/// Generate and reply in one go, the same as pressing both buttons in
/// the task pane.
pub async fn run(message: &Path, config: AppConfig) -> Result<()> {
    let mailbox = FileMailbox::open(message, &config.drafts_path).await?;
    let session = Session::new(config);

    let generated = session.generate_response(&mailbox).await;
    eprintln!("{}", session.status());
    generated?;

    let replied = session.reply_with_response(&mailbox).await;
    eprintln!("{}", session.status());
    replied?;
    if let Some(path) = mailbox.draft_path() {
        println!("{}", path.display());
    }

    Ok(())
}
