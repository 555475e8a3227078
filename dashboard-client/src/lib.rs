//! Dashboard Client - zone/distributor administration over the dashboard API
//!
//! Entity stores over HTTP, the query cache, and the composite orchestrator
//! that keeps a zone and its distributor in step.

pub mod cache;
pub mod composite;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod http;
pub mod store;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};

pub use cache::{QueryCache, QueryKey, ViewStateCache};
pub use composite::{
    CompositeError, CompositeStep, CompositeZone, Confirm, DELETE_PROMPT, DeleteOutcome,
    EditSession, EditTarget, OperationKind, OperationState, ZoneDistributorOrchestrator,
};
pub use dashboard::{Notice, NoticeLevel, ZonesPage};
pub use form::{FormError, ZoneDistributorForm};
pub use store::{DistributorStore, HttpDistributorStore, HttpZoneStore, ZoneStore};

// Re-export shared models for convenience
pub use shared::models::{Distributor, DistributorCreate, DistributorUpdate, Zone, ZoneCreate, ZoneUpdate};
