//! Campaign portal backend — campaign cards, sessions, and the auth gate.
//!
//! Data stored in DashMap (development); swap to PostgreSQL for production.

pub mod auth;
pub mod card;
pub mod handlers;
pub mod models;
pub mod router;
pub mod sessions;
pub mod store;

pub use auth::{AuthGate, GateDecision, RouteClass, RouteMatcher, SessionResolver};
pub use card::CampaignCard;
pub use handlers::PortalState;
pub use router::portal_router;
pub use sessions::SessionStore;
pub use store::CampaignStore;
