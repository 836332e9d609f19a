//! Operational endpoints: health, readiness, liveness.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use campaign_management::CampaignStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared state for the operational handlers.
#[derive(Clone)]
pub struct AppState {
    pub campaigns: Arc<CampaignStore>,
    pub node_id: String,
    pub start_time: Instant,
}

/// GET /health — Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        campaigns: state.campaigns.list_campaigns().len(),
    })
}

/// GET /ready — Readiness probe for Kubernetes.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live — Liveness probe for Kubernetes.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub campaigns: usize,
}
