//! Zones page model
//!
//! Everything the zones administration screen holds between renders: the
//! displayed list, the active search, the create form, the edit session and
//! the notices raised by the last operations. Every mutation is followed by a
//! reconcile that re-reads the list through the query cache.

use std::sync::Arc;

use shared::models::{Distributor, Zone};

use crate::ClientResult;
use crate::cache::{QueryCache, QueryKey};
use crate::composite::{
    CompositeError, CompositeZone, Confirm, DeleteOutcome, EditSession, EditTarget,
    ZoneDistributorOrchestrator,
};
use crate::form::ZoneDistributorForm;
use crate::store::{DistributorStore, ZoneStore, filter_distributors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// User-facing message produced by a page operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct ZonesPage<Z, D> {
    orchestrator: ZoneDistributorOrchestrator<Z, D, Arc<QueryCache>>,
    cache: Arc<QueryCache>,
    zones: Vec<Zone>,
    search_term: String,
    /// Create form input
    pub create_form: ZoneDistributorForm,
    /// Open edit, if any
    pub edit: EditSession,
    notices: Vec<Notice>,
    pending_retry: Option<i64>,
}

impl<Z, D> ZonesPage<Z, D>
where
    Z: ZoneStore,
    D: DistributorStore,
{
    pub fn new(zones: Z, distributors: D) -> Self {
        Self::with_cache(zones, distributors, Arc::new(QueryCache::new()))
    }

    pub fn with_cache(zones: Z, distributors: D, cache: Arc<QueryCache>) -> Self {
        Self {
            orchestrator: ZoneDistributorOrchestrator::new(zones, distributors, cache.clone()),
            cache,
            zones: Vec::new(),
            search_term: String::new(),
            create_form: ZoneDistributorForm::default(),
            edit: EditSession::default(),
            notices: Vec::new(),
            pending_retry: None,
        }
    }

    pub fn orchestrator(&self) -> &ZoneDistributorOrchestrator<Z, D, Arc<QueryCache>> {
        &self.orchestrator
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Zones currently displayed
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Zone whose distributor still needs creating after a partial create
    pub fn pending_retry(&self) -> Option<i64> {
        self.pending_retry
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Initial read of the zone list
    pub async fn load(&mut self) -> ClientResult<()> {
        self.reconcile().await
    }

    /// Switch the active search; a blank term shows every zone
    pub async fn search(&mut self, term: &str) -> ClientResult<()> {
        self.search_term = term.trim().to_string();
        self.reconcile().await
    }

    /// Open the edit form for a displayed zone, prefilled from it
    pub fn open_edit(&mut self, zone_id: i64) -> bool {
        match self.zones.iter().find(|z| z.id == zone_id) {
            Some(zone) => {
                self.edit = EditSession::open(zone);
                true
            }
            None => {
                self.notices
                    .push(Notice::error(format!("Zone {zone_id} is not displayed")));
                false
            }
        }
    }

    pub fn close_edit(&mut self) {
        self.edit.close();
    }

    pub async fn submit_create(&mut self) -> Result<CompositeZone, CompositeError> {
        let result = self
            .orchestrator
            .create_zone_with_distributor(&mut self.create_form)
            .await;

        match &result {
            Ok(created) => {
                self.pending_retry = None;
                self.notices.push(Notice::success(format!(
                    "Zone \"{}\" created with its distributor",
                    created.zone.name
                )));
            }
            Err(err) => {
                if let CompositeError::Partial { zone_id, .. } = err {
                    self.pending_retry = Some(*zone_id);
                }
                self.notices.push(Notice::error(err.to_string()));
            }
        }
        self.reconcile_after(&result).await;
        result
    }

    /// Create the missing distributor of the zone left by a partial create
    pub async fn retry_distributor(&mut self) -> Result<Distributor, CompositeError> {
        let Some(zone_id) = self.pending_retry else {
            return Err(CompositeError::NoTarget);
        };

        let result = self
            .orchestrator
            .retry_distributor_create(zone_id, &mut self.create_form)
            .await;

        match &result {
            Ok(_) => {
                self.pending_retry = None;
                self.notices.push(Notice::success("Distributor created"));
            }
            Err(err) => self.notices.push(Notice::error(err.to_string())),
        }
        self.reconcile_after(&result).await;
        result
    }

    pub async fn submit_edit(&mut self) -> Result<CompositeZone, CompositeError> {
        let result = self
            .orchestrator
            .update_zone_with_distributor(&mut self.edit)
            .await;

        match &result {
            Ok(updated) => self.notices.push(Notice::success(format!(
                "Zone \"{}\" updated",
                updated.zone.name
            ))),
            Err(err) => self.notices.push(Notice::error(err.to_string())),
        }
        self.reconcile_after(&result).await;
        result
    }

    /// Delete a displayed zone and its distributor after confirmation
    pub async fn delete(
        &mut self,
        zone_id: i64,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, CompositeError> {
        let Some(target) = self
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(EditTarget::from_zone)
        else {
            self.notices
                .push(Notice::error(format!("Zone {zone_id} is not displayed")));
            return Err(CompositeError::NoTarget);
        };

        let result = self
            .orchestrator
            .delete_zone_with_distributor(target, confirm)
            .await;

        match &result {
            Ok(DeleteOutcome::Deleted) => {
                if self.edit.target.as_ref().is_some_and(|t| t.zone_id == zone_id) {
                    self.edit.close();
                }
                if self.pending_retry == Some(zone_id) {
                    self.pending_retry = None;
                }
                self.notices.push(Notice::success("Zone deleted"));
            }
            Ok(DeleteOutcome::Cancelled) => {}
            Err(err) => self.notices.push(Notice::error(err.to_string())),
        }
        if matches!(result, Ok(DeleteOutcome::Deleted)) || changed_backend(&result) {
            self.refresh().await;
        }
        result
    }

    /// Distributors of one zone whose name matches `term`; blank yields none
    pub async fn search_distributors(
        &self,
        zone_id: i64,
        term: &str,
    ) -> ClientResult<Vec<Distributor>> {
        if term.trim().is_empty() {
            return Ok(Vec::new());
        }
        let all: Vec<Distributor> = self
            .cache
            .get_or_fetch(QueryKey::zone_distributors(zone_id), || {
                self.orchestrator.distributors().list_by_zone(zone_id)
            })
            .await?;
        Ok(filter_distributors(all, term))
    }

    async fn reconcile(&mut self) -> ClientResult<()> {
        let zones: Vec<Zone> = if self.search_term.is_empty() {
            self.cache
                .get_or_fetch(QueryKey::zones(), || self.orchestrator.zones().list())
                .await?
        } else {
            let term = self.search_term.as_str();
            self.cache
                .get_or_fetch(QueryKey::zone_search(term), || {
                    self.orchestrator.zones().search(term)
                })
                .await?
        };
        tracing::debug!(count = zones.len(), term = %self.search_term, "Zones reconciled");
        self.zones = zones;
        Ok(())
    }

    async fn reconcile_after<T>(&mut self, result: &Result<T, CompositeError>) {
        if result.is_ok() || changed_backend(result) {
            self.refresh().await;
        }
    }

    /// Reconcile, reporting a failed read as a notice
    async fn refresh(&mut self) {
        if let Err(err) = self.reconcile().await {
            tracing::error!(error = %err, "Failed to reload zones");
            self.notices
                .push(Notice::error(format!("Failed to reload zones: {err}")));
        }
    }
}

/// Whether the failed operation left a change behind on the backend
///
/// Only partial failures do; a transport failure at the first step wrote
/// nothing and did not invalidate the cache.
fn changed_backend<T>(result: &Result<T, CompositeError>) -> bool {
    matches!(result, Err(CompositeError::Partial { .. }))
}
