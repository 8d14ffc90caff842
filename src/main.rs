use anyhow::{Context, Result};
use clap::Parser;
use opportunity_matcher::cli::{handle_command, Cli};
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("opportunity_matcher=info,rocket::server=off"));

    let file_layer = match std::env::var("LOG_FILE") {
        Ok(path) if !path.is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(Mutex::new(file))
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        _ => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    handle_command(Cli::parse()).await
}
