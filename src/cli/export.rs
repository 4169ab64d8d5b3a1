use std::path::Path;

use anyhow::Result;

use crate::actions::Session;
use crate::core::AppConfig;
use crate::email::{DirectorySaver, FileMailbox};

pub async fn run(message: &Path, config: AppConfig) -> Result<()> {
    let mailbox = FileMailbox::open(message, &config.drafts_path).await?;
    let saver = DirectorySaver::new(&config.export_path);
    let session = Session::new(config);

    let result = session.save_email_as_json(&mailbox, &saver).await;
    eprintln!("{}", session.status());
    let filename = result?;
    println!("{}", saver.path_for(&filename).display());

    Ok(())
}
