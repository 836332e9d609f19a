//! Axum handlers for the portal pages and the campaign/auth API.

use crate::auth::{self, AuthGate, StoreSessionResolver};
use crate::card::{render_grid, CampaignCard};
use crate::models::*;
use crate::sessions::{self, SessionStore};
use crate::store::CampaignStore;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use campaign_core::config::AuthConfig;
use campaign_core::{CampaignError, CampaignResult};
use maud::{html, Markup, DOCTYPE};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared portal state.
#[derive(Clone)]
pub struct PortalState {
    pub campaigns: Arc<CampaignStore>,
    pub sessions: Arc<SessionStore>,
    pub auth: Arc<AuthConfig>,
}

impl PortalState {
    pub fn new(campaigns: Arc<CampaignStore>, auth: AuthConfig) -> CampaignResult<Self> {
        Ok(Self {
            campaigns,
            sessions: Arc::new(SessionStore::new(auth.session_ttl_hours)?),
            auth: Arc::new(auth),
        })
    }

    /// Auth gate resolving sessions against this state's session store.
    pub fn auth_gate(&self) -> CampaignResult<AuthGate> {
        let resolver = StoreSessionResolver::new(self.sessions.clone(), self.auth.cookie_name.clone());
        AuthGate::from_config(Arc::new(resolver), &self.auth)
    }

    fn current_session(&self, headers: &HeaderMap) -> Option<Session> {
        auth::session_token(headers, &self.auth.cookie_name).and_then(|t| self.sessions.lookup(&t))
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="es" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                main class="container mx-auto p-6" { (body) }
            }
        }
    }
}

fn heading(text: &str) -> Markup {
    html! {
        h1 class="text-2xl font-bold mb-6" { (text) }
    }
}

fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        page("No encontrada", heading("Campaña no encontrada")),
    )
        .into_response()
}

// ─── Pages ─────────────────────────────────────────────────────────────────

pub async fn dashboard_page(State(state): State<PortalState>) -> Markup {
    let campaigns = state.campaigns.list_campaigns();
    page(
        "Mis campañas",
        html! {
            (heading("Mis campañas"))
            (render_grid(&campaigns))
        },
    )
}

pub async fn manage_campaign_page(
    State(state): State<PortalState>,
    Path(id): Path<String>,
) -> Response {
    match state.campaigns.get_campaign(&id) {
        Some(summary) => page(
            &summary.title,
            html! {
                (heading(&format!("Administrar: {}", summary.title)))
                (CampaignCard::from_summary(&summary))
            },
        )
        .into_response(),
        None => not_found_page(),
    }
}

pub async fn campaign_page(State(state): State<PortalState>, Path(id): Path<String>) -> Response {
    match state.campaigns.get_campaign(&id) {
        Some(summary) => {
            page(&summary.title, html! { (CampaignCard::from_summary(&summary)) }).into_response()
        }
        None => not_found_page(),
    }
}

pub async fn create_campaign_page() -> Markup {
    page(
        "Nueva campaña",
        html! {
            (heading("Nueva campaña"))
            form data-endpoint="/api/v1/campaigns" method="post" {
                input name="title" placeholder="Título";
                input name="category" placeholder="Categoría";
                input name="location" placeholder="Ubicación";
                input name="goalAmount" type="number" placeholder="Meta (Bs.)";
                button type="submit" { "Crear" }
            }
        },
    )
}

pub async fn profile_page(State(state): State<PortalState>, headers: HeaderMap) -> Markup {
    let user = state
        .current_session(&headers)
        .map(|s| s.user)
        .unwrap_or_default();
    page(
        "Perfil",
        html! {
            (heading("Perfil"))
            p { (user) }
        },
    )
}

pub async fn sign_in_page() -> Markup {
    page(
        "Iniciar sesión",
        html! {
            (heading("Iniciar sesión"))
            form data-endpoint="/api/v1/auth/sign-in" method="post" {
                input name="username";
                input name="password" type="password";
                button type="submit" { "Entrar" }
            }
            a href="/sign-up" { "Crear cuenta" }
        },
    )
}

/// Account registration lives with the identity provider; this page only
/// points there and back to sign-in.
pub async fn sign_up_page() -> Markup {
    page(
        "Crear cuenta",
        html! {
            (heading("Crear cuenta"))
            p data-sign-up="unavailable" {
                "El registro de cuentas no está disponible en este entorno. "
                "Inicia sesión con tus credenciales de desarrollo."
            }
            a href="/sign-in" { "Ir a iniciar sesión" }
        },
    )
}

// ─── Auth API ──────────────────────────────────────────────────────────────

pub async fn sign_in(
    State(state): State<PortalState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    match sessions::authenticate(&req, &state.auth) {
        Ok(user) => {
            let session = state.sessions.issue(&user).map_err(|e| {
                error!(user = %user, error = %e, "Failed to issue session");
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "session_failed", e.to_string())
            })?;
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                state.auth.cookie_name,
                session.token,
                state.auth.session_ttl_hours * 3600
            );
            metrics::counter!("auth.sign_in.success").increment(1);
            info!(user = %user, "User signed in");
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(LoginResponse::from(session)),
            ))
        }
        Err(e) => {
            metrics::counter!("auth.sign_in.failure").increment(1);
            warn!(username = %req.username, error = %e, "Sign-in rejected");
            Err(api_error(StatusCode::UNAUTHORIZED, "auth_failed", e.to_string()))
        }
    }
}

pub async fn sign_out(State(state): State<PortalState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = auth::session_token(&headers, &state.auth.cookie_name) {
        if state.sessions.revoke(&token) {
            metrics::counter!("auth.sign_out").increment(1);
        }
    }
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        state.auth.cookie_name
    );
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

// ─── Campaign API ──────────────────────────────────────────────────────────

pub async fn list_campaigns(State(state): State<PortalState>) -> Json<Vec<CampaignSummary>> {
    Json(state.campaigns.list_campaigns())
}

pub async fn get_campaign(
    State(state): State<PortalState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignSummary>, StatusCode> {
    state
        .campaigns
        .get_campaign(&id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn campaign_card(
    State(state): State<PortalState>,
    Path(id): Path<String>,
) -> Result<Json<CampaignCard>, StatusCode> {
    state
        .campaigns
        .get_campaign(&id)
        .map(|summary| Json(CampaignCard::from_summary(&summary)))
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn create_campaign(
    State(state): State<PortalState>,
    headers: HeaderMap,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignSummary>), ApiError> {
    if state.current_session(&headers).is_none() {
        return Err(api_error(
            StatusCode::UNAUTHORIZED,
            "missing_auth",
            "A signed-in session is required",
        ));
    }
    validate_create(&req).map_err(|e| api_error(StatusCode::BAD_REQUEST, "invalid_campaign", e.to_string()))?;

    let campaign = state.campaigns.create_campaign(req);
    metrics::counter!("portal.campaigns.created").increment(1);
    Ok((StatusCode::CREATED, Json(campaign)))
}

fn validate_create(req: &CreateCampaignRequest) -> CampaignResult<()> {
    if req.title.trim().is_empty() {
        return Err(CampaignError::Validation("campaign 'title' must not be empty".to_string()));
    }
    if !req.goal_amount.is_finite() || req.goal_amount <= 0.0 {
        return Err(CampaignError::Validation("campaign 'goalAmount' must be positive".to_string()));
    }
    if !req.raised_amount.is_finite() || req.raised_amount < 0.0 {
        return Err(CampaignError::Validation("campaign 'raisedAmount' must be non-negative".to_string()));
    }
    Ok(())
}
