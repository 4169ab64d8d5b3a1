use anyhow::Result;
use draftpane::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
