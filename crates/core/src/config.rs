use crate::error::{CampaignError, CampaignResult};
use serde::Deserialize;

/// Longest session lifetime accepted, one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_PORTAL__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// ─── Auth Config ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    /// Development password accepted for any username.
    #[serde(default = "default_dev_password")]
    pub dev_password: String,
    /// Paths the auth gate is activated for. `/prefix/:path*` matches the
    /// prefix and everything below it; anything else is an exact match.
    #[serde(default = "default_matcher")]
    pub matcher: Vec<String>,
    #[serde(default)]
    pub on_session_error: SessionErrorPolicy,
}

/// What the auth gate does when the session lookup itself fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionErrorPolicy {
    /// Treat the request as unauthenticated.
    #[default]
    FailClosed,
    /// Let the request through untouched.
    FailOpen,
}

// Default functions
fn default_node_id() -> String {
    "portal-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_enabled() -> bool {
    true
}
fn default_metrics_port() -> u16 {
    9091
}
fn default_cookie_name() -> String {
    "ce_session".to_string()
}
fn default_session_ttl_hours() -> i64 {
    24
}
fn default_dev_password() -> String {
    "campaign2024".to_string()
}
fn default_matcher() -> Vec<String> {
    vec![
        "/dashboard/:path*".to_string(),
        "/profile/:path*".to_string(),
        "/campaigns/create/:path*".to_string(),
        "/sign-in".to_string(),
        "/sign-up".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            port: default_metrics_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            session_ttl_hours: default_session_ttl_hours(),
            dev_password: default_dev_password(),
            matcher: default_matcher(),
            on_session_error: SessionErrorPolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Reject settings the session store cannot honour.
    pub fn validate(&self) -> CampaignResult<()> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session_ttl_hours) {
            return Err(CampaignError::Config(format!(
                "auth.session_ttl_hours must be between 1 and {MAX_SESSION_TTL_HOURS}, got {}",
                self.session_ttl_hours
            )));
        }
        if self.cookie_name.is_empty() {
            return Err(CampaignError::Config("auth.cookie_name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and validate it.
    pub fn load() -> CampaignResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_PORTAL")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("auth.matcher"),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CampaignResult<()> {
        self.auth.validate()
    }
}
