//! Cardia Server binary
//!
//! Starts the HTTP explanation service.

use anyhow::Context;
use cardia_server::{config::ServerConfig, start_server};
use clap::Parser;

/// Cardia explanation service - structured explanations for heart risk predictions.
#[derive(Debug, Parser)]
#[command(name = "cardia-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "CARDIA_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => ServerConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => {
            eprintln!("Warning: No config file specified, using default configuration");
            ServerConfig::default_config()
        }
    };

    start_server(config).await?;

    Ok(())
}
