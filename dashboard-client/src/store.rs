//! Entity stores
//!
//! Per-entity CRUD contracts the orchestrator and page model consume, plus
//! their HTTP implementations against the dashboard backend.

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{
    Distributor, DistributorCreate, DistributorUpdate, Zone, ZoneCreate, ZoneSearchQuery,
    ZoneUpdate,
};

use crate::{ClientResult, HttpClient};

/// Remote access to zones
#[async_trait]
pub trait ZoneStore: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Zone>>;
    /// Backend search by name; a blank term yields an empty list
    async fn search(&self, term: &str) -> ClientResult<Vec<Zone>>;
    async fn create(&self, data: &ZoneCreate) -> ClientResult<Zone>;
    async fn update(&self, id: i64, data: &ZoneUpdate) -> ClientResult<Zone>;
    async fn delete(&self, id: i64) -> ClientResult<()>;
}

/// Remote access to distributors
#[async_trait]
pub trait DistributorStore: Send + Sync {
    async fn list_by_zone(&self, zone_id: i64) -> ClientResult<Vec<Distributor>>;
    async fn create(&self, data: &DistributorCreate) -> ClientResult<Distributor>;
    async fn update(&self, id: i64, data: &DistributorUpdate) -> ClientResult<Distributor>;
    async fn delete(&self, id: i64) -> ClientResult<()>;

    /// Filter a zone's distributors by first or last name (case-insensitive)
    async fn search_in_zone(&self, zone_id: i64, term: &str) -> ClientResult<Vec<Distributor>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        let all = self.list_by_zone(zone_id).await?;
        Ok(filter_distributors(all, term))
    }
}

/// Keep distributors whose first or last name contains `term`, ignoring case
///
/// A blank term matches nothing.
pub fn filter_distributors(distributors: Vec<Distributor>, term: &str) -> Vec<Distributor> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }
    distributors
        .into_iter()
        .filter(|d| {
            d.name.to_lowercase().contains(&term) || d.last_name.to_lowercase().contains(&term)
        })
        .collect()
}

#[async_trait]
impl<T: ZoneStore + ?Sized> ZoneStore for Arc<T> {
    async fn list(&self) -> ClientResult<Vec<Zone>> {
        (**self).list().await
    }

    async fn search(&self, term: &str) -> ClientResult<Vec<Zone>> {
        (**self).search(term).await
    }

    async fn create(&self, data: &ZoneCreate) -> ClientResult<Zone> {
        (**self).create(data).await
    }

    async fn update(&self, id: i64, data: &ZoneUpdate) -> ClientResult<Zone> {
        (**self).update(id, data).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<T: DistributorStore + ?Sized> DistributorStore for Arc<T> {
    async fn list_by_zone(&self, zone_id: i64) -> ClientResult<Vec<Distributor>> {
        (**self).list_by_zone(zone_id).await
    }

    async fn create(&self, data: &DistributorCreate) -> ClientResult<Distributor> {
        (**self).create(data).await
    }

    async fn update(&self, id: i64, data: &DistributorUpdate) -> ClientResult<Distributor> {
        (**self).update(id, data).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        (**self).delete(id).await
    }
}

/// `ZoneStore` over the REST API (`/api/zones`)
#[derive(Debug, Clone)]
pub struct HttpZoneStore<H> {
    http: H,
}

impl<H: HttpClient> HttpZoneStore<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> ZoneStore for HttpZoneStore<H> {
    async fn list(&self) -> ClientResult<Vec<Zone>> {
        self.http.get("api/zones").await
    }

    async fn search(&self, term: &str) -> ClientResult<Vec<Zone>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let query = ZoneSearchQuery {
            name: term.to_string(),
        };
        self.http.get_with_query("api/zones/search", &query).await
    }

    async fn create(&self, data: &ZoneCreate) -> ClientResult<Zone> {
        self.http.post("api/zones", data).await
    }

    async fn update(&self, id: i64, data: &ZoneUpdate) -> ClientResult<Zone> {
        self.http.put(&format!("api/zones/{id}"), data).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        let _deleted: bool = self.http.delete(&format!("api/zones/{id}")).await?;
        Ok(())
    }
}

/// `DistributorStore` over the REST API (`/api/distributors`)
#[derive(Debug, Clone)]
pub struct HttpDistributorStore<H> {
    http: H,
}

impl<H: HttpClient> HttpDistributorStore<H> {
    pub fn new(http: H) -> Self {
        Self { http }
    }
}

#[async_trait]
impl<H: HttpClient> DistributorStore for HttpDistributorStore<H> {
    async fn list_by_zone(&self, zone_id: i64) -> ClientResult<Vec<Distributor>> {
        self.http
            .get(&format!("api/zones/{zone_id}/distributors"))
            .await
    }

    async fn create(&self, data: &DistributorCreate) -> ClientResult<Distributor> {
        self.http.post("api/distributors", data).await
    }

    async fn update(&self, id: i64, data: &DistributorUpdate) -> ClientResult<Distributor> {
        self.http.put(&format!("api/distributors/{id}"), data).await
    }

    async fn delete(&self, id: i64) -> ClientResult<()> {
        let _deleted: bool = self.http.delete(&format!("api/distributors/{id}")).await?;
        Ok(())
    }
}
