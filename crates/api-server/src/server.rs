//! API server — assembles the portal router and serves it over HTTP.

use crate::rest::{self, AppState};
use axum::routing::get;
use axum::Router;
use campaign_core::config::AppConfig;
use campaign_management::{portal_router, CampaignStore, PortalState};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// HTTP server hosting the portal pages, the JSON API and the probes.
pub struct ApiServer {
    config: AppConfig,
    state: PortalState,
}

impl ApiServer {
    pub fn new(config: AppConfig, campaigns: Arc<CampaignStore>) -> anyhow::Result<Self> {
        let state = PortalState::new(campaigns, config.auth.clone())?;
        Ok(Self { config, state })
    }

    pub fn state(&self) -> &PortalState {
        &self.state
    }

    /// Build the full application router.
    pub fn router(&self) -> anyhow::Result<Router> {
        let gate = self.state.auth_gate()?;

        let ops = Router::new()
            .route("/health", get(rest::health_check))
            .route("/ready", get(rest::readiness))
            .route("/live", get(rest::liveness))
            .with_state(AppState {
                campaigns: self.state.campaigns.clone(),
                node_id: self.config.node_id.clone(),
                start_time: Instant::now(),
            });

        Ok(ops
            .merge(portal_router(self.state.clone(), gate))
            // Middleware
            .layer(CompressionLayer::new())
            .layer(TraceLayer::new_for_http()))
    }

    /// Start the HTTP server.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let app = self.router()?;

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics server on a separate port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
        builder
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
