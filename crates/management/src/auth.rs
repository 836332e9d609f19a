//! Auth gate — per-request redirect middleware driven by session state.
//!
//! Paths are classified by case-sensitive prefix:
//! - protected: `/dashboard`, `/profile`, `/campaigns/create`
//! - auth-only: `/sign-in`, `/sign-up`
//!
//! Signed-in users hitting an auth-only page go to `/dashboard`; anonymous
//! users hitting a protected page go to `/sign-in`. Everything else passes
//! through untouched. The gate only runs for paths in its [`RouteMatcher`].

use crate::models::Session;
use crate::sessions::SessionStore;
use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use campaign_core::config::{AuthConfig, SessionErrorPolicy};
use campaign_core::{CampaignError, CampaignResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Where signed-in users are sent from auth-only pages.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Where anonymous users are sent from protected pages.
pub const SIGN_IN_PATH: &str = "/sign-in";

const PROTECTED_PREFIXES: [&str; 3] = ["/dashboard", "/profile", "/campaigns/create"];
const AUTH_ONLY_PREFIXES: [&str; 2] = ["/sign-in", "/sign-up"];

// ─── Decision ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a session.
    Protected,
    /// Only meant for users without a session.
    AuthOnly,
    Unrestricted,
}

impl RouteClass {
    pub fn classify(path: &str) -> Self {
        if PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
            RouteClass::Protected
        } else if AUTH_ONLY_PREFIXES.iter().any(|p| path.starts_with(p)) {
            RouteClass::AuthOnly
        } else {
            RouteClass::Unrestricted
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    Redirect(&'static str),
}

/// Decide what to do with a request. First matching rule wins.
pub fn decide(path: &str, is_authenticated: bool) -> GateDecision {
    match (is_authenticated, RouteClass::classify(path)) {
        (true, RouteClass::AuthOnly) => GateDecision::Redirect(DASHBOARD_PATH),
        (false, RouteClass::Protected) => GateDecision::Redirect(SIGN_IN_PATH),
        _ => GateDecision::PassThrough,
    }
}

// ─── Activation scope ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
enum MatchPattern {
    Exact(String),
    /// `/base/:param*` — the base itself and anything below it.
    Subtree(String),
}

/// Set of paths the gate is activated for.
#[derive(Debug, Clone)]
pub struct RouteMatcher {
    patterns: Vec<MatchPattern>,
}

impl RouteMatcher {
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> CampaignResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| parse_pattern(p.as_ref()))
            .collect::<CampaignResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|pattern| match pattern {
            MatchPattern::Exact(exact) => path == exact,
            MatchPattern::Subtree(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        })
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        let patterns = AuthConfig::default().matcher;
        Self {
            patterns: patterns
                .iter()
                .filter_map(|p| parse_pattern(p).ok())
                .collect(),
        }
    }
}

fn parse_pattern(pattern: &str) -> CampaignResult<MatchPattern> {
    if !pattern.starts_with('/') {
        return Err(CampaignError::Config(format!(
            "matcher pattern must start with '/': {pattern}"
        )));
    }

    match pattern.rsplit_once('/') {
        Some((base, last)) if last.starts_with(':') && last.ends_with('*') => {
            if base.is_empty() || base.contains(':') {
                return Err(CampaignError::Config(format!(
                    "unsupported matcher pattern: {pattern}"
                )));
            }
            Ok(MatchPattern::Subtree(base.to_string()))
        }
        _ if pattern.contains(':') => Err(CampaignError::Config(format!(
            "unsupported matcher pattern: {pattern}"
        ))),
        _ => Ok(MatchPattern::Exact(pattern.to_string())),
    }
}

// ─── Session resolution ────────────────────────────────────────────────────

/// Resolves the session attached to a request, if any.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> CampaignResult<Option<Session>>;
}

/// Resolver backed by the in-memory [`SessionStore`].
///
/// Reads the session token from the session cookie, falling back to an
/// `Authorization: Bearer` header.
pub struct StoreSessionResolver {
    store: Arc<SessionStore>,
    cookie_name: String,
}

impl StoreSessionResolver {
    pub fn new(store: Arc<SessionStore>, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl SessionResolver for StoreSessionResolver {
    async fn resolve(&self, headers: &HeaderMap) -> CampaignResult<Option<Session>> {
        Ok(session_token(headers, &self.cookie_name).and_then(|token| self.store.lookup(&token)))
    }
}

/// Extract the session token from the cookie named `cookie_name` or a bearer token.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    })
}

// ─── Gate ──────────────────────────────────────────────────────────────────

/// Auth gate state shared by every request.
#[derive(Clone)]
pub struct AuthGate {
    resolver: Arc<dyn SessionResolver>,
    matcher: Arc<RouteMatcher>,
    on_session_error: SessionErrorPolicy,
}

impl AuthGate {
    pub fn new(
        resolver: Arc<dyn SessionResolver>,
        matcher: RouteMatcher,
        on_session_error: SessionErrorPolicy,
    ) -> Self {
        Self {
            resolver,
            matcher: Arc::new(matcher),
            on_session_error,
        }
    }

    pub fn from_config(
        resolver: Arc<dyn SessionResolver>,
        config: &AuthConfig,
    ) -> CampaignResult<Self> {
        Ok(Self::new(
            resolver,
            RouteMatcher::from_patterns(&config.matcher)?,
            config.on_session_error,
        ))
    }

    /// Whether the gate runs at all for `path`.
    pub fn is_active_for(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }

    /// Look up the session and decide. Performs exactly one session lookup.
    pub async fn check(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        let is_authenticated = match self.resolver.resolve(headers).await {
            Ok(session) => session.is_some(),
            Err(e) => {
                metrics::counter!("auth_gate.session_errors").increment(1);
                match self.on_session_error {
                    SessionErrorPolicy::FailClosed => {
                        warn!(error = %e, path, "Session lookup failed, treating as signed out");
                        false
                    }
                    SessionErrorPolicy::FailOpen => {
                        warn!(error = %e, path, "Session lookup failed, letting request through");
                        return GateDecision::PassThrough;
                    }
                }
            }
        };
        decide(path, is_authenticated)
    }
}

/// Axum middleware running the [`AuthGate`] in front of the page routes.
pub async fn auth_gate(State(gate): State<AuthGate>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if !gate.is_active_for(&path) {
        return next.run(req).await;
    }

    match gate.check(&path, req.headers()).await {
        GateDecision::Redirect(to) => {
            debug!(path = %path, to, "Auth gate redirect");
            metrics::counter!("auth_gate.redirects", "to" => to).increment(1);
            Redirect::temporary(to).into_response()
        }
        GateDecision::PassThrough => next.run(req).await,
    }
}
