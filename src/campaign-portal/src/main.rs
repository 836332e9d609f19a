//! Campaign Portal — fundraising campaign pages behind a session-aware auth gate.
//!
//! Main entry point that loads configuration and starts the server.

use campaign_api::ApiServer;
use campaign_core::config::AppConfig;
use campaign_management::CampaignStore;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "campaign-portal")]
#[command(about = "Fundraising campaign portal with session-aware auth gate")]
#[command(version)]
struct Cli {
    /// Node identifier (overrides config)
    #[arg(long, env = "CAMPAIGN_PORTAL__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "CAMPAIGN_PORTAL__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics port (overrides config)
    #[arg(long, env = "CAMPAIGN_PORTAL__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Do not start the Prometheus exporter
    #[arg(long, default_value_t = false)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_portal=info,campaign_management=info,campaign_api=info,tower_http=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Campaign Portal starting up");

    // Load configuration
    // An invalid setting is fatal; the defaults are never substituted for it
    let mut config = AppConfig::load().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    // Apply CLI overrides
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if cli.no_metrics {
        config.metrics.enabled = false;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        gated_paths = ?config.auth.matcher,
        on_session_error = ?config.auth.on_session_error,
        "Configuration loaded"
    );

    let campaigns = Arc::new(CampaignStore::new());
    let api_server = ApiServer::new(config.clone(), campaigns)?;

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("Campaign Portal is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
