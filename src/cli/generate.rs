use std::path::Path;

use anyhow::Result;

use crate::actions::Session;
use crate::core::AppConfig;
use crate::email::FileMailbox;

pub async fn run(message: &Path, config: AppConfig) -> Result<()> {
    let mailbox = FileMailbox::open(message, &config.drafts_path).await?;
    let session = Session::new(config);

    let result = session.generate_response(&mailbox).await;
    eprintln!("{}", session.status());
    println!("{}", result?);

    Ok(())
}
