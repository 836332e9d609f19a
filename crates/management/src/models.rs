//! Portal domain types — campaign summaries, statuses, sessions, API payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Campaign ──────────────────────────────────────────────────────────────

/// Lifecycle status of a fundraising campaign as shown on its card.
///
/// Unknown keys deserialize to [`CampaignStatus::Draft`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CampaignStatus {
    Active,
    PendingVerification,
    InRevision,
    Completed,
    #[default]
    Draft,
}

/// Display label and badge color classes for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub label: &'static str,
    pub color: &'static str,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 5] = [
        CampaignStatus::Active,
        CampaignStatus::PendingVerification,
        CampaignStatus::InRevision,
        CampaignStatus::Completed,
        CampaignStatus::Draft,
    ];

    /// Parse a status key, falling back to `Draft` for anything unrecognized.
    pub fn from_key(key: &str) -> Self {
        match key {
            "active" => CampaignStatus::Active,
            "pending_verification" => CampaignStatus::PendingVerification,
            "in_revision" => CampaignStatus::InRevision,
            "completed" => CampaignStatus::Completed,
            _ => CampaignStatus::Draft,
        }
    }

    pub fn as_key(&self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::PendingVerification => "pending_verification",
            CampaignStatus::InRevision => "in_revision",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Draft => "draft",
        }
    }

    pub fn info(&self) -> StatusInfo {
        match self {
            CampaignStatus::Active => StatusInfo {
                label: "Activa",
                color: "text-green-600 bg-green-100",
            },
            CampaignStatus::PendingVerification => StatusInfo {
                label: "Sin Verificar",
                color: "text-blue-600 bg-blue-100",
            },
            CampaignStatus::InRevision => StatusInfo {
                label: "En Revisión",
                color: "text-purple-600 bg-purple-100",
            },
            CampaignStatus::Completed => StatusInfo {
                label: "Finalizada",
                color: "text-red-600 bg-red-100",
            },
            CampaignStatus::Draft => StatusInfo {
                label: "Borrador",
                color: "text-gray-600 bg-gray-100",
            },
        }
    }
}

impl From<String> for CampaignStatus {
    fn from(key: String) -> Self {
        CampaignStatus::from_key(&key)
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_key())
    }
}

/// Summary of a campaign, the input of a campaign card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    pub location: String,
    pub raised_amount: f64,
    pub goal_amount: f64,
    /// Percentage, normally 0–100. Never clamped.
    pub progress: f64,
    #[serde(default)]
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub category: String,
    pub location: String,
    pub goal_amount: f64,
    #[serde(default)]
    pub raised_amount: f64,
}

// ─── Session ───────────────────────────────────────────────────────────────

/// An authenticated user session issued by the sign-in endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            user: session.user,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        let expected = [
            (CampaignStatus::Active, "Activa", "text-green-600 bg-green-100"),
            (CampaignStatus::PendingVerification, "Sin Verificar", "text-blue-600 bg-blue-100"),
            (CampaignStatus::InRevision, "En Revisión", "text-purple-600 bg-purple-100"),
            (CampaignStatus::Completed, "Finalizada", "text-red-600 bg-red-100"),
            (CampaignStatus::Draft, "Borrador", "text-gray-600 bg-gray-100"),
        ];
        for (status, label, color) in expected {
            let info = status.info();
            assert_eq!(info.label, label);
            assert_eq!(info.color, color);
            assert_eq!(CampaignStatus::from_key(status.as_key()), status);
        }
    }

    #[test]
    fn test_unknown_status_falls_back_to_draft() {
        assert_eq!(CampaignStatus::from_key("archived"), CampaignStatus::Draft);
        assert_eq!(CampaignStatus::from_key(""), CampaignStatus::Draft);
        assert_eq!(CampaignStatus::from_key("ACTIVE"), CampaignStatus::Draft);

        let status: CampaignStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, CampaignStatus::Draft);
    }

    #[test]
    fn test_summary_json_shape() {
        let summary: CampaignSummary = serde_json::from_str(
            r#"{
                "id": "c-1",
                "title": "Reforestación",
                "imageUrl": "",
                "category": "Medio ambiente",
                "location": "Santa Cruz",
                "raisedAmount": 15000,
                "goalAmount": 50000,
                "progress": 30,
                "status": "pending_verification"
            }"#,
        )
        .unwrap();
        assert_eq!(summary.status, CampaignStatus::PendingVerification);
        assert_eq!(summary.image_url.as_deref(), Some(""));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["status"], "pending_verification");
        assert_eq!(json["raisedAmount"], 15000.0);
    }

    #[test]
    fn test_missing_status_is_draft() {
        let summary: CampaignSummary = serde_json::from_str(
            r#"{"id":"x","title":"t","category":"c","location":"l",
                "raisedAmount":0,"goalAmount":1,"progress":0}"#,
        )
        .unwrap();
        assert_eq!(summary.status, CampaignStatus::Draft);
        assert!(summary.image_url.is_none());
    }
}
