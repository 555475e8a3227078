//! Data models
//!
//! Shared between dashboard-server and dashboard-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod distributor;
pub mod zone;

// Re-exports
pub use distributor::*;
pub use zone::*;
