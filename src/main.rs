use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use meridian_core::{CompanyProfile, InfoProvider};
use meridian_server::ServerConfig;

/// Session router serving Meridian company information over streamable HTTP.
#[derive(Parser, Debug)]
#[command(name = "meridian", version)]
struct Cli {
    /// Listening port. Falls back to the PORT environment variable, then
    /// the built-in default.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let port = cli
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or_else(|| ServerConfig::default().port);

    let config = ServerConfig {
        port,
        ..Default::default()
    };
    let info: Arc<dyn InfoProvider> = Arc::new(CompanyProfile::default());

    let handle = meridian_server::start(config, info)
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    tracing::info!(port = handle.port, "meridian ready");

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;
    tracing::info!("shutting down");
    Ok(())
}
