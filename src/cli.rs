// src/cli.rs
use crate::core::ConfigManager;
use crate::session::SessionContext;
use crate::web::start_web_server;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "upmatch")]
#[command(about = "Upwork job search backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Durable credential store
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the REST API server
    Serve {
        /// Overrides ROCKET_PORT and config.yaml
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the Upwork authorization URL
    LoginUrl,
    /// Report whether tokens are stored
    Status,
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load(&cli.env_file).await?;

    match cli.command {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.environment.port);
            info!("Server: http://0.0.0.0:{}", port);
            start_web_server(config, port).await
        }
        Command::LoginUrl => {
            let missing = config.oauth.missing_fields();
            if !missing.is_empty() {
                anyhow::bail!("OAuth client is not configured: {}", missing.join(", "));
            }
            let session = SessionContext::from_config(&config).await?;
            println!("{}", session.authorization_url());
            Ok(())
        }
        Command::Status => {
            let session = SessionContext::from_config(&config).await?;
            let authenticated = session.is_authenticated().await;
            println!(
                "{}",
                if authenticated {
                    "authenticated"
                } else {
                    "not authenticated"
                }
            );
            Ok(())
        }
    }
}
