//! In-memory campaign store backed by DashMap.
//!
//! Production: replace with PostgreSQL (sqlx) or similar ACID store.
//! This provides the same API surface for development and testing.

use crate::models::*;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

/// Thread-safe in-memory store of campaign summaries.
pub struct CampaignStore {
    campaigns: DashMap<String, CampaignSummary>,
}

impl CampaignStore {
    /// Empty store.
    pub fn empty() -> Self {
        Self {
            campaigns: DashMap::new(),
        }
    }

    /// Store seeded with demo campaigns.
    pub fn new() -> Self {
        info!("Campaign store initialized (in-memory, development mode)");
        let store = Self::empty();
        store.seed_demo_data();
        store
    }

    pub fn list_campaigns(&self) -> Vec<CampaignSummary> {
        let mut campaigns: Vec<CampaignSummary> =
            self.campaigns.iter().map(|r| r.value().clone()).collect();
        campaigns.sort_by(|a, b| a.title.cmp(&b.title));
        campaigns
    }

    pub fn get_campaign(&self, id: &str) -> Option<CampaignSummary> {
        self.campaigns.get(id).map(|r| r.value().clone())
    }

    pub fn insert_campaign(&self, summary: CampaignSummary) {
        self.campaigns.insert(summary.id.clone(), summary);
    }

    /// Create a new campaign in `draft` status.
    pub fn create_campaign(&self, req: CreateCampaignRequest) -> CampaignSummary {
        let progress = if req.goal_amount > 0.0 {
            (req.raised_amount / req.goal_amount * 100.0).round()
        } else {
            0.0
        };
        let summary = CampaignSummary {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            image_url: req.image_url,
            category: req.category,
            location: req.location,
            raised_amount: req.raised_amount,
            goal_amount: req.goal_amount,
            progress,
            status: CampaignStatus::Draft,
        };
        self.insert_campaign(summary.clone());
        info!(campaign_id = %summary.id, title = %summary.title, "Campaign created");
        summary
    }

    fn seed_demo_data(&self) {
        let demo = [
            ("amboro-reforestacion", "Reforestación del Amboró", "Medio ambiente", "Santa Cruz", 15000.0, 50000.0, CampaignStatus::Active, None),
            ("agua-samaipata", "Agua potable para Samaipata", "Salud", "Samaipata", 8200.0, 20000.0, CampaignStatus::PendingVerification, Some("/campaigns/agua.jpg")),
            ("biblioteca-sucre", "Biblioteca comunitaria", "Educación", "Sucre", 30500.0, 30000.0, CampaignStatus::Completed, None),
            ("refugio-animal", "Refugio de animales rescatados", "Animales", "Cochabamba", 1250.0, 12000.0, CampaignStatus::InRevision, Some("/campaigns/refugio.jpg")),
            ("huerto-escolar", "Huertos escolares", "Educación", "Tarija", 0.0, 8000.0, CampaignStatus::Draft, None),
        ];

        for (id, title, category, location, raised, goal, status, image) in demo {
            self.insert_campaign(CampaignSummary {
                id: id.to_string(),
                title: title.to_string(),
                image_url: image.map(str::to_string),
                category: category.to_string(),
                location: location.to_string(),
                raised_amount: raised,
                goal_amount: goal,
                progress: (raised / goal * 100.0).round(),
                status,
            });
        }
        info!(count = self.campaigns.len(), "Seeded demo campaigns");
    }
}

impl Default for CampaignStore {
    fn default() -> Self {
        Self::new()
    }
}
