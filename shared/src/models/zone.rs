//! Zone Model

use serde::{Deserialize, Serialize};

use super::distributor::Distributor;

/// Zone entity (配送区域)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Distributors assigned to this zone, ordered by id
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub distributors: Vec<Distributor>,
}

/// How a zone relates to its distributors from the dashboard's point of view.
///
/// The backend allows any number of distributors per zone; the dashboard
/// manages at most one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistributorLink<'a> {
    /// No distributor assigned
    None,
    /// Exactly one distributor assigned
    One(&'a Distributor),
    /// More than one distributor assigned (not produced by the dashboard)
    Many(&'a [Distributor]),
}

impl<'a> DistributorLink<'a> {
    /// The distributor the dashboard edits and deletes together with the zone.
    ///
    /// For `Many` this is the first (lowest id) distributor.
    pub fn primary(&self) -> Option<&'a Distributor> {
        match *self {
            Self::None => None,
            Self::One(d) => Some(d),
            Self::Many(all) => all.first(),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Many(_))
    }
}

impl Zone {
    /// Classify the zone's distributor association
    pub fn distributor_link(&self) -> DistributorLink<'_> {
        match self.distributors.as_slice() {
            [] => DistributorLink::None,
            [one] => DistributorLink::One(one),
            many => DistributorLink::Many(many),
        }
    }
}

/// Create zone payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Update zone payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query string for `GET /api/zones/search`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSearchQuery {
    pub name: String,
}
