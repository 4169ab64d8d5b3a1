use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::core::AppConfig;

pub mod draft;
pub mod export;
pub mod generate;
pub mod reply;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Save a message as JSON into the exports directory
    Export {
        /// Path to the message JSON
        #[arg(long)]
        message: PathBuf,
    },
    /// Generate a draft response and print it
    Generate {
        #[arg(long)]
        message: PathBuf,
    },
    /// Format a response and open it as a reply-all draft
    Reply {
        #[arg(long)]
        message: PathBuf,
        /// Path to the response text, e.g. the output of `generate`
        #[arg(long)]
        response: PathBuf,
    },
    /// Generate a draft response and open it as a reply-all draft
    Draft {
        #[arg(long)]
        message: PathBuf,
    },
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    // Logs go to stderr so that drafts printed to stdout can be piped
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,tower_http=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Export { message }) => {
            export::run(&message, config).await?;
        }
        Some(Command::Generate { message }) => {
            generate::run(&message, config).await?;
        }
        Some(Command::Reply { message, response }) => {
            reply::run(&message, &response, config).await?;
        }
        Some(Command::Draft { message }) => {
            draft::run(&message, config).await?;
        }
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        None => {}
    }

    Ok(())
}
