//! Portal router — pages behind the auth gate plus the JSON API under /api/v1.

use crate::auth::{auth_gate, AuthGate};
use crate::handlers::{self, PortalState};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

/// Build the portal router. The gate is layered over every route and decides
/// per request, via its matcher, whether it applies.
pub fn portal_router(state: PortalState, gate: AuthGate) -> Router {
    Router::new()
        // Pages
        .route("/dashboard", get(handlers::dashboard_page))
        .route("/dashboard/campaigns/:id", get(handlers::manage_campaign_page))
        .route("/campaigns/create", get(handlers::create_campaign_page))
        .route("/campaigns/:id", get(handlers::campaign_page))
        .route("/profile", get(handlers::profile_page))
        .route("/sign-in", get(handlers::sign_in_page))
        .route("/sign-up", get(handlers::sign_up_page))
        // Auth
        .route("/api/v1/auth/sign-in", post(handlers::sign_in))
        .route("/api/v1/auth/sign-out", post(handlers::sign_out))
        // Campaigns
        .route("/api/v1/campaigns", get(handlers::list_campaigns).post(handlers::create_campaign))
        .route("/api/v1/campaigns/:id", get(handlers::get_campaign))
        .route("/api/v1/campaigns/:id/card", get(handlers::campaign_card))
        .layer(middleware::from_fn_with_state(gate, auth_gate))
        .with_state(state)
}
