//! Session issuing and lookup.
//!
//! Development: accepts `admin`/`admin` or any user with the configured dev
//! password, and keeps sessions in memory.
//! Production: back [`SessionStore`] with the identity provider instead.

use crate::models::{LoginRequest, Session};
use campaign_core::config::{AuthConfig, MAX_SESSION_TTL_HOURS};
use campaign_core::{CampaignError, CampaignResult};
use chrono::{Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use tracing::debug;

const TOKEN_PREFIX: &str = "ce_sess_";

/// Thread-safe in-memory store of issued sessions, keyed by token.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    /// Sessions live for `ttl_hours`, between one hour and [`MAX_SESSION_TTL_HOURS`].
    pub fn new(ttl_hours: i64) -> CampaignResult<Self> {
        let ttl = Some(ttl_hours)
            .filter(|h| (1..=MAX_SESSION_TTL_HOURS).contains(h))
            .and_then(Duration::try_hours)
            .ok_or_else(|| CampaignError::Config(format!("invalid session ttl: {ttl_hours} hours")))?;
        Ok(Self {
            sessions: DashMap::new(),
            ttl,
        })
    }

    /// Issue a fresh session for `user`.
    pub fn issue(&self, user: &str) -> CampaignResult<Session> {
        let expires_at = Utc::now()
            .checked_add_signed(self.ttl)
            .ok_or_else(|| CampaignError::Session("session expiry out of range".to_string()))?;
        let session = Session {
            token: generate_token(),
            user: user.to_string(),
            expires_at,
        };
        self.sessions.insert(session.token.clone(), session.clone());
        debug!(user = %session.user, "Session issued");
        Ok(session)
    }

    /// Look up a live session. Expired sessions are evicted and reported absent.
    pub fn lookup(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token).map(|r| r.value().clone())?;
        if session.is_expired() {
            self.sessions.remove(token);
            debug!(user = %session.user, "Expired session evicted");
            return None;
        }
        Some(session)
    }

    /// Revoke a session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn insert(&self, session: Session) {
        self.sessions.insert(session.token.clone(), session);
    }
}

/// Validate sign-in credentials.
pub fn authenticate(req: &LoginRequest, config: &AuthConfig) -> CampaignResult<String> {
    if req.username.trim().is_empty() {
        return Err(CampaignError::Validation("username must not be empty".to_string()));
    }
    if (req.username == "admin" && req.password == "admin") || req.password == config.dev_password {
        Ok(req.username.clone())
    } else {
        Err(CampaignError::Validation("Invalid credentials".to_string()))
    }
}

/// Generate a random session token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!(
        "{}{}",
        TOKEN_PREFIX,
        bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_lookup_revoke() {
        let store = SessionStore::new(24).unwrap();
        let session = store.issue("maria").unwrap();
        assert!(session.token.starts_with(TOKEN_PREFIX));
        assert_eq!(session.token.len(), TOKEN_PREFIX.len() + 64);

        let found = store.lookup(&session.token).unwrap();
        assert_eq!(found.user, "maria");

        assert!(store.revoke(&session.token));
        assert!(store.lookup(&session.token).is_none());
        assert!(!store.revoke(&session.token));
    }

    #[test]
    fn test_expired_session_is_evicted() {
        let store = SessionStore::new(24).unwrap();
        store.insert(Session {
            token: "ce_sess_old".to_string(),
            user: "juan".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        });
        assert_eq!(store.len(), 1);
        assert!(store.lookup("ce_sess_old").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_unusable_ttl() {
        for hours in [0, -1, i64::MIN, i64::MAX, 1_000_000_000_000, MAX_SESSION_TTL_HOURS + 1] {
            assert!(
                matches!(SessionStore::new(hours), Err(CampaignError::Config(_))),
                "{hours}"
            );
        }
    }

    #[test]
    fn test_longest_ttl_issues_sessions() {
        let store = SessionStore::new(MAX_SESSION_TTL_HOURS).unwrap();
        let session = store.issue("ana").unwrap();
        assert!(session.expires_at > Utc::now() + Duration::days(364));
    }

    #[test]
    fn test_authenticate() {
        let config = AuthConfig::default();
        let ok = |u: &str, p: &str| {
            authenticate(
                &LoginRequest {
                    username: u.to_string(),
                    password: p.to_string(),
                },
                &config,
            )
        };
        assert_eq!(ok("admin", "admin").unwrap(), "admin");
        assert_eq!(ok("ana", "campaign2024").unwrap(), "ana");
        assert!(ok("ana", "admin").is_err());
        assert!(ok("", "campaign2024").is_err());
    }
}
