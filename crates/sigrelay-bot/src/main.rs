//! sigrelay - Webhook-to-exchange order relay - Entry Point

use anyhow::Result;
use clap::Parser;
use sigrelay_bot::config::credentials_from_env;
use sigrelay_bot::{AppConfig, Application};
use tracing::info;

/// Relay trade signals from a webhook to Binance futures with TP/SL protection.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via SIGRELAY_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Determine config path: CLI arg > SIGRELAY_CONFIG env var > default
    let config_path = AppConfig::resolve_path(args.config);
    let config = AppConfig::load(&config_path)?;

    sigrelay_telemetry::init_logging(Some(config.telemetry.log_level.as_str()))?;

    info!("Starting sigrelay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        found = std::path::Path::new(&config_path).exists(),
        "Configuration loaded"
    );

    let credentials = credentials_from_env(|key| std::env::var(key).ok());
    let app = Application::new(config, credentials)?;
    app.run().await?;

    Ok(())
}
