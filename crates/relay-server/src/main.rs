//! Webhook → Gate.io order relay - entry point.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// TradingView-style webhook to Gate.io spot order relay
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via RELAY_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    relay_telemetry::init_logging()?;

    info!("Starting webhook relay v{}", env!("CARGO_PKG_VERSION"));

    // Config path: CLI arg > RELAY_CONFIG env var > default
    let config_path = args
        .config
        .or_else(|| std::env::var("RELAY_CONFIG").ok())
        .unwrap_or_else(|| "config/default.toml".to_string());

    info!(config_path = %config_path, "Loading configuration");
    let config = relay_server::AppConfig::load(&config_path)?;

    let app = relay_server::Application::new(config)?;
    app.run().await?;

    Ok(())
}
