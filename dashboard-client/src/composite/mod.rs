//! Composite zone + distributor operations
//!
//! The backend has no endpoint that writes a zone and its distributor
//! together, so each user-facing operation is two ordered store calls:
//!
//! | Operation | First call | Second call |
//! |-----------|------------|-------------|
//! | create | create zone | create distributor (`zone_id` = new zone) |
//! | update | update zone | update distributor (`zone_id` re-sent), if one is linked |
//! | delete | delete distributor, if one is linked | delete zone |
//!
//! When the second call fails after the first succeeded, the result is a
//! [`CompositeError::Partial`] naming both steps; nothing is rolled back.

mod confirm;
mod error;
mod orchestrator;
mod state;

pub use confirm::{Confirm, DELETE_PROMPT};
pub use error::CompositeError;
pub use orchestrator::{
    CompositeZone, DeleteOutcome, EditSession, EditTarget, ZoneDistributorOrchestrator,
};
pub use state::{CompositeStep, OperationKind, OperationState};
