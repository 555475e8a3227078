//! Distributor Model

use serde::{Deserialize, Serialize};

/// Distributor entity, assigned to service one zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Distributor {
    pub id: i64,
    pub name: String,
    pub last_name: String,
    /// National identity document, kept as an opaque string
    pub national_id: String,
    /// Delivery fee charged by this distributor (non-negative)
    pub delivery_value: f64,
    /// Owning zone
    pub zone_id: i64,
}

/// Create distributor payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorCreate {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub delivery_value: f64,
    pub zone_id: i64,
}

/// Update distributor payload
///
/// Every field is required: `zone_id` travels with each update so a
/// partial payload can never detach the distributor from its zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributorUpdate {
    pub name: String,
    pub last_name: String,
    pub national_id: String,
    pub delivery_value: f64,
    pub zone_id: i64,
}
