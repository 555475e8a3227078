//! Composite save/delete orchestrator

use shared::models::{Distributor, DistributorLink, Zone};

use super::state::OperationSlots;
use super::{CompositeError, CompositeStep, Confirm, DELETE_PROMPT, OperationKind, OperationState};
use crate::cache::{QueryKey, ViewStateCache};
use crate::form::ZoneDistributorForm;
use crate::store::{DistributorStore, ZoneStore};

/// A zone together with the distributor written alongside it
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeZone {
    pub zone: Zone,
    pub distributor: Option<Distributor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation declined; no backend call was made
    Cancelled,
}

/// The zone an edit or delete applies to, and its linked distributors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub zone_id: i64,
    /// Distributor edited alongside the zone
    pub distributor_id: Option<i64>,
    /// Further distributors of a zone holding several; only removed on delete
    pub extra_distributor_ids: Vec<i64>,
}

impl EditTarget {
    pub fn new(zone_id: i64, distributor_id: Option<i64>) -> Self {
        Self {
            zone_id,
            distributor_id,
            extra_distributor_ids: Vec::new(),
        }
    }

    /// Target a loaded zone, its primary distributor and any others
    pub fn from_zone(zone: &Zone) -> Self {
        match zone.distributor_link() {
            DistributorLink::None => Self::new(zone.id, None),
            DistributorLink::One(d) => Self::new(zone.id, Some(d.id)),
            DistributorLink::Many(all) => {
                tracing::warn!(
                    zone_id = zone.id,
                    count = all.len(),
                    "Zone has several distributors; edits apply to the first only"
                );
                let (first, rest) = match all.split_first() {
                    Some((first, rest)) => (Some(first.id), rest),
                    None => (None, all),
                };
                Self {
                    zone_id: zone.id,
                    distributor_id: first,
                    extra_distributor_ids: rest.iter().map(|d| d.id).collect(),
                }
            }
        }
    }

    /// Every distributor that must go before the zone can be deleted
    pub fn distributor_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.distributor_id
            .into_iter()
            .chain(self.extra_distributor_ids.iter().copied())
    }
}

/// Edit form state: which zone is being edited and what the user typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    pub target: Option<EditTarget>,
    pub form: ZoneDistributorForm,
}

impl EditSession {
    pub fn open(zone: &Zone) -> Self {
        Self {
            target: Some(EditTarget::from_zone(zone)),
            form: ZoneDistributorForm::for_zone(zone),
        }
    }

    pub fn close(&mut self) {
        self.target = None;
        self.form.clear();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }
}

/// Drives create/update/delete of a zone and its distributor
///
/// Stores and cache are injected; each operation kind carries its own
/// processing flag so a duplicate submit is refused while one is in flight.
pub struct ZoneDistributorOrchestrator<Z, D, C> {
    zones: Z,
    distributors: D,
    cache: C,
    ops: OperationSlots,
}

impl<Z, D, C> ZoneDistributorOrchestrator<Z, D, C>
where
    Z: ZoneStore,
    D: DistributorStore,
    C: ViewStateCache,
{
    pub fn new(zones: Z, distributors: D, cache: C) -> Self {
        Self {
            zones,
            distributors,
            cache,
            ops: OperationSlots::default(),
        }
    }

    pub fn zones(&self) -> &Z {
        &self.zones
    }

    pub fn distributors(&self) -> &D {
        &self.distributors
    }

    pub fn state(&self, kind: OperationKind) -> OperationState {
        self.ops.get(kind)
    }

    pub fn is_processing(&self, kind: OperationKind) -> bool {
        self.state(kind) == OperationState::InFlight
    }

    /// Create the zone, then its distributor bound to the new zone id
    ///
    /// On success the zone list is invalidated and `form` cleared. When the
    /// distributor fails the zone stays; the error carries its id for
    /// [`retry_distributor_create`](Self::retry_distributor_create).
    pub async fn create_zone_with_distributor(
        &self,
        form: &mut ZoneDistributorForm,
    ) -> Result<CompositeZone, CompositeError> {
        let zone_data = form.zone_create()?;
        let fields = form.distributor_fields()?;
        let guard = self.ops.begin(OperationKind::Create)?;

        let zone = match self.zones.create(&zone_data).await {
            Ok(zone) => zone,
            Err(source) => {
                tracing::error!(error = %source, "Zone creation failed");
                guard.finish(OperationState::Failed(CompositeStep::CreateZone));
                return Err(CompositeError::Transport {
                    step: CompositeStep::CreateZone,
                    source,
                });
            }
        };

        match self.distributors.create(&fields.into_create(zone.id)).await {
            Ok(distributor) => {
                self.invalidate();
                form.clear();
                guard.finish(OperationState::Succeeded);
                tracing::info!(
                    zone_id = zone.id,
                    distributor_id = distributor.id,
                    "Zone created with distributor"
                );
                Ok(CompositeZone {
                    zone,
                    distributor: Some(distributor),
                })
            }
            Err(source) => {
                tracing::warn!(
                    zone_id = zone.id,
                    step = %CompositeStep::CreateDistributor,
                    error = %source,
                    "Zone created but distributor creation failed"
                );
                self.invalidate();
                guard.finish(OperationState::PartiallyFailed(
                    CompositeStep::CreateDistributor,
                ));
                Err(CompositeError::Partial {
                    completed: CompositeStep::CreateZone,
                    failed: CompositeStep::CreateDistributor,
                    zone_id: zone.id,
                    source,
                })
            }
        }
    }

    /// Create only the distributor half for a zone that already exists
    pub async fn retry_distributor_create(
        &self,
        zone_id: i64,
        form: &mut ZoneDistributorForm,
    ) -> Result<Distributor, CompositeError> {
        let fields = form.distributor_fields()?;
        let guard = self.ops.begin(OperationKind::Create)?;

        match self.distributors.create(&fields.into_create(zone_id)).await {
            Ok(distributor) => {
                self.invalidate();
                form.clear();
                guard.finish(OperationState::Succeeded);
                tracing::info!(zone_id, distributor_id = distributor.id, "Distributor created on retry");
                Ok(distributor)
            }
            Err(source) => {
                tracing::error!(zone_id, error = %source, "Distributor retry failed");
                guard.finish(OperationState::PartiallyFailed(
                    CompositeStep::CreateDistributor,
                ));
                Err(CompositeError::Transport {
                    step: CompositeStep::CreateDistributor,
                    source,
                })
            }
        }
    }

    /// Update the zone, then its linked distributor (if any) with `zone_id`
    ///
    /// Without a target this returns [`CompositeError::NoTarget`] and makes
    /// no call. A zone without a distributor only gets the zone update; any
    /// distributor input in the form is ignored. On success the session is
    /// closed.
    pub async fn update_zone_with_distributor(
        &self,
        session: &mut EditSession,
    ) -> Result<CompositeZone, CompositeError> {
        let Some(target) = session.target.clone() else {
            tracing::debug!("Update requested without a selected zone");
            return Err(CompositeError::NoTarget);
        };

        let zone_data = session.form.zone_update()?;
        let distributor_data = match target.distributor_id {
            Some(id) => Some((
                id,
                session.form.distributor_fields()?.into_update(target.zone_id),
            )),
            None => {
                if session.form.has_distributor_input() {
                    tracing::warn!(
                        zone_id = target.zone_id,
                        "Zone has no distributor; distributor fields ignored"
                    );
                }
                None
            }
        };
        let guard = self.ops.begin(OperationKind::Update)?;

        let zone = match self.zones.update(target.zone_id, &zone_data).await {
            Ok(zone) => zone,
            Err(source) => {
                tracing::error!(zone_id = target.zone_id, error = %source, "Zone update failed");
                guard.finish(OperationState::Failed(CompositeStep::UpdateZone));
                return Err(CompositeError::Transport {
                    step: CompositeStep::UpdateZone,
                    source,
                });
            }
        };

        let distributor = match distributor_data {
            Some((id, data)) => match self.distributors.update(id, &data).await {
                Ok(distributor) => Some(distributor),
                Err(source) => {
                    tracing::warn!(
                        zone_id = target.zone_id,
                        distributor_id = id,
                        step = %CompositeStep::UpdateDistributor,
                        error = %source,
                        "Zone updated but distributor update failed"
                    );
                    self.invalidate();
                    guard.finish(OperationState::PartiallyFailed(
                        CompositeStep::UpdateDistributor,
                    ));
                    return Err(CompositeError::Partial {
                        completed: CompositeStep::UpdateZone,
                        failed: CompositeStep::UpdateDistributor,
                        zone_id: target.zone_id,
                        source,
                    });
                }
            },
            None => None,
        };

        self.invalidate();
        session.close();
        guard.finish(OperationState::Succeeded);
        tracing::info!(
            zone_id = zone.id,
            distributor_id = distributor.as_ref().map(|d| d.id),
            "Zone updated"
        );
        Ok(CompositeZone { zone, distributor })
    }

    /// Delete every linked distributor, then the zone
    ///
    /// Nothing is sent unless `confirm` accepts [`DELETE_PROMPT`]. The
    /// backend refuses to delete a zone that still has distributors, so a
    /// failure after the first distributor is gone is reported as partial.
    pub async fn delete_zone_with_distributor(
        &self,
        target: EditTarget,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, CompositeError> {
        let guard = self.ops.begin(OperationKind::Delete)?;
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(zone_id = target.zone_id, "Zone deletion cancelled");
            drop(guard);
            return Ok(DeleteOutcome::Cancelled);
        }

        let mut deleted = 0usize;
        for distributor_id in target.distributor_ids() {
            let Err(source) = self.distributors.delete(distributor_id).await else {
                deleted += 1;
                continue;
            };
            if deleted == 0 {
                tracing::error!(distributor_id, error = %source, "Distributor deletion failed");
                guard.finish(OperationState::Failed(CompositeStep::DeleteDistributor));
                return Err(CompositeError::Transport {
                    step: CompositeStep::DeleteDistributor,
                    source,
                });
            }
            tracing::warn!(
                zone_id = target.zone_id,
                distributor_id,
                deleted,
                error = %source,
                "Some distributors deleted but not all"
            );
            self.invalidate();
            guard.finish(OperationState::PartiallyFailed(
                CompositeStep::DeleteDistributor,
            ));
            return Err(CompositeError::Partial {
                completed: CompositeStep::DeleteDistributor,
                failed: CompositeStep::DeleteDistributor,
                zone_id: target.zone_id,
                source,
            });
        }

        if let Err(source) = self.zones.delete(target.zone_id).await {
            if deleted == 0 {
                tracing::error!(zone_id = target.zone_id, error = %source, "Zone deletion failed");
                guard.finish(OperationState::Failed(CompositeStep::DeleteZone));
                return Err(CompositeError::Transport {
                    step: CompositeStep::DeleteZone,
                    source,
                });
            }
            tracing::warn!(
                zone_id = target.zone_id,
                deleted,
                step = %CompositeStep::DeleteZone,
                error = %source,
                "Distributors deleted but zone deletion failed"
            );
            self.invalidate();
            guard.finish(OperationState::PartiallyFailed(CompositeStep::DeleteZone));
            return Err(CompositeError::Partial {
                completed: CompositeStep::DeleteDistributor,
                failed: CompositeStep::DeleteZone,
                zone_id: target.zone_id,
                source,
            });
        }

        self.invalidate();
        guard.finish(OperationState::Succeeded);
        tracing::info!(zone_id = target.zone_id, distributors = deleted, "Zone deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn invalidate(&self) {
        self.cache.invalidate(&QueryKey::zones());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientError, ClientResult};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::models::{DistributorCreate, DistributorUpdate, ZoneCreate, ZoneUpdate};
    use std::collections::HashSet;
    use std::sync::Arc;

    /// One store call, as observed by the fakes
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateZone(ZoneCreate),
        UpdateZone(i64, ZoneUpdate),
        DeleteZone(i64),
        CreateDistributor(DistributorCreate),
        UpdateDistributor(i64, DistributorUpdate),
        DeleteDistributor(i64),
    }

    /// In-memory backend shared by both fake stores
    #[derive(Default)]
    struct FakeBackend {
        calls: Mutex<Vec<Call>>,
        zones: Mutex<Vec<Zone>>,
        distributors: Mutex<Vec<Distributor>>,
        fail: Mutex<HashSet<CompositeStep>>,
        invalidations: Mutex<Vec<QueryKey>>,
        next_id: Mutex<i64>,
    }

    impl FakeBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn fail_on(&self, step: CompositeStep) {
            self.fail.lock().insert(step);
        }

        fn check(&self, step: CompositeStep) -> ClientResult<()> {
            if self.fail.lock().contains(&step) {
                return Err(ClientError::Internal(format!("{step} unavailable")));
            }
            Ok(())
        }

        fn next_id(&self) -> i64 {
            let mut id = self.next_id.lock();
            *id += 1;
            *id
        }

        fn seed_zone(&self, id: i64, name: &str) {
            self.zones.lock().push(Zone {
                id,
                name: name.to_string(),
                description: Some("seeded".to_string()),
                distributors: vec![],
            });
        }

        fn seed_distributor(&self, id: i64, zone_id: i64) {
            self.distributors.lock().push(Distributor {
                id,
                name: "Ana".into(),
                last_name: "Lopez".into(),
                national_id: "123".into(),
                delivery_value: 15.5,
                zone_id,
            });
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        fn invalidation_count(&self) -> usize {
            self.invalidations.lock().len()
        }
    }

    struct FakeZones(Arc<FakeBackend>);
    struct FakeDistributors(Arc<FakeBackend>);
    struct FakeCache(Arc<FakeBackend>);

    #[async_trait]
    impl ZoneStore for FakeZones {
        async fn list(&self) -> ClientResult<Vec<Zone>> {
            Ok(self.0.zones.lock().clone())
        }

        async fn search(&self, term: &str) -> ClientResult<Vec<Zone>> {
            let term = term.to_lowercase();
            Ok(self
                .0
                .zones
                .lock()
                .iter()
                .filter(|z| z.name.to_lowercase().contains(&term))
                .cloned()
                .collect())
        }

        async fn create(&self, data: &ZoneCreate) -> ClientResult<Zone> {
            self.0.calls.lock().push(Call::CreateZone(data.clone()));
            self.0.check(CompositeStep::CreateZone)?;
            let zone = Zone {
                id: self.0.next_id(),
                name: data.name.clone(),
                description: data.description.clone(),
                distributors: vec![],
            };
            self.0.zones.lock().push(zone.clone());
            Ok(zone)
        }

        async fn update(&self, id: i64, data: &ZoneUpdate) -> ClientResult<Zone> {
            self.0.calls.lock().push(Call::UpdateZone(id, data.clone()));
            self.0.check(CompositeStep::UpdateZone)?;
            let mut zones = self.0.zones.lock();
            let zone = zones
                .iter_mut()
                .find(|z| z.id == id)
                .ok_or_else(|| ClientError::NotFound(format!("zone {id}")))?;
            if let Some(name) = &data.name {
                zone.name = name.clone();
            }
            if let Some(description) = &data.description {
                zone.description = Some(description.clone());
            }
            Ok(zone.clone())
        }

        async fn delete(&self, id: i64) -> ClientResult<()> {
            self.0.calls.lock().push(Call::DeleteZone(id));
            self.0.check(CompositeStep::DeleteZone)?;
            // same referential rule as the backend
            if self.0.distributors.lock().iter().any(|d| d.zone_id == id) {
                return Err(ClientError::Conflict(format!("zone {id} has distributors")));
            }
            self.0.zones.lock().retain(|z| z.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl DistributorStore for FakeDistributors {
        async fn list_by_zone(&self, zone_id: i64) -> ClientResult<Vec<Distributor>> {
            Ok(self
                .0
                .distributors
                .lock()
                .iter()
                .filter(|d| d.zone_id == zone_id)
                .cloned()
                .collect())
        }

        async fn create(&self, data: &DistributorCreate) -> ClientResult<Distributor> {
            self.0.calls.lock().push(Call::CreateDistributor(data.clone()));
            self.0.check(CompositeStep::CreateDistributor)?;
            let distributor = Distributor {
                id: self.0.next_id(),
                name: data.name.clone(),
                last_name: data.last_name.clone(),
                national_id: data.national_id.clone(),
                delivery_value: data.delivery_value,
                zone_id: data.zone_id,
            };
            self.0.distributors.lock().push(distributor.clone());
            Ok(distributor)
        }

        async fn update(&self, id: i64, data: &DistributorUpdate) -> ClientResult<Distributor> {
            self.0.calls.lock().push(Call::UpdateDistributor(id, data.clone()));
            self.0.check(CompositeStep::UpdateDistributor)?;
            Ok(Distributor {
                id,
                name: data.name.clone(),
                last_name: data.last_name.clone(),
                national_id: data.national_id.clone(),
                delivery_value: data.delivery_value,
                zone_id: data.zone_id,
            })
        }

        async fn delete(&self, id: i64) -> ClientResult<()> {
            self.0.calls.lock().push(Call::DeleteDistributor(id));
            self.0.check(CompositeStep::DeleteDistributor)?;
            let mut distributors = self.0.distributors.lock();
            if !distributors.iter().any(|d| d.id == id) {
                return Err(ClientError::NotFound(format!("distributor {id}")));
            }
            distributors.retain(|d| d.id != id);
            Ok(())
        }
    }

    impl ViewStateCache for FakeCache {
        fn invalidate(&self, key: &QueryKey) {
            self.0.invalidations.lock().push(key.clone());
        }
    }

    type TestOrchestrator = ZoneDistributorOrchestrator<FakeZones, FakeDistributors, FakeCache>;

    fn orchestrator(backend: &Arc<FakeBackend>) -> TestOrchestrator {
        ZoneDistributorOrchestrator::new(
            FakeZones(backend.clone()),
            FakeDistributors(backend.clone()),
            FakeCache(backend.clone()),
        )
    }

    fn north_form() -> ZoneDistributorForm {
        ZoneDistributorForm {
            zone_name: "North".into(),
            zone_description: "Northern region".into(),
            distributor_name: "Ana".into(),
            distributor_last_name: "Lopez".into(),
            distributor_national_id: "123".into(),
            distributor_delivery_value: "15.50".into(),
        }
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    // ==================== create ====================

    #[tokio::test]
    async fn test_create_zone_then_distributor() {
        let backend = FakeBackend::new();
        let orch = orchestrator(&backend);
        let mut form = north_form();

        let created = orch.create_zone_with_distributor(&mut form).await.unwrap();

        let distributor = created.distributor.unwrap();
        assert_eq!(distributor.zone_id, created.zone.id);
        assert_eq!(distributor.delivery_value, 15.5);
        assert_eq!(
            backend.calls(),
            vec![
                Call::CreateZone(ZoneCreate {
                    name: "North".into(),
                    description: Some("Northern region".into()),
                }),
                Call::CreateDistributor(DistributorCreate {
                    name: "Ana".into(),
                    last_name: "Lopez".into(),
                    national_id: "123".into(),
                    delivery_value: 15.5,
                    zone_id: created.zone.id,
                }),
            ]
        );
        assert_eq!(backend.invalidation_count(), 1);
        assert_eq!(backend.invalidations.lock()[0], QueryKey::zones());
        assert_eq!(form, ZoneDistributorForm::default());
        assert_eq!(orch.state(OperationKind::Create), OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_create_validation_makes_no_calls() {
        let backend = FakeBackend::new();
        let orch = orchestrator(&backend);
        let mut form = north_form();
        form.distributor_delivery_value = "-2".into();

        let err = orch.create_zone_with_distributor(&mut form).await.unwrap_err();

        assert!(matches!(err, CompositeError::Validation(_)));
        assert!(backend.calls().is_empty());
        assert_eq!(backend.invalidation_count(), 0);
        assert_eq!(orch.state(OperationKind::Create), OperationState::Idle);
        // input kept for correction
        assert_eq!(form.zone_name, "North");
    }

    #[tokio::test]
    async fn test_create_zone_failure_skips_distributor() {
        let backend = FakeBackend::new();
        backend.fail_on(CompositeStep::CreateZone);
        let orch = orchestrator(&backend);

        let err = orch
            .create_zone_with_distributor(&mut north_form())
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CompositeStep::CreateZone));
        assert!(!err.is_partial());
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(backend.invalidation_count(), 0);
        assert_eq!(
            orch.state(OperationKind::Create),
            OperationState::Failed(CompositeStep::CreateZone)
        );
    }

    #[tokio::test]
    async fn test_create_partial_failure_keeps_zone() {
        let backend = FakeBackend::new();
        backend.fail_on(CompositeStep::CreateDistributor);
        let orch = orchestrator(&backend);
        let mut form = north_form();

        let err = orch.create_zone_with_distributor(&mut form).await.unwrap_err();

        let CompositeError::Partial {
            completed,
            failed,
            zone_id,
            ..
        } = err
        else {
            panic!("expected partial failure, got {err:?}");
        };
        assert_eq!(completed, CompositeStep::CreateZone);
        assert_eq!(failed, CompositeStep::CreateDistributor);

        // zone not rolled back
        let zones = orch.zones().list().await.unwrap();
        assert!(zones.iter().any(|z| z.id == zone_id));
        assert!(!backend.calls().iter().any(|c| matches!(c, Call::DeleteZone(_))));

        assert_eq!(backend.invalidation_count(), 1);
        assert_eq!(form.distributor_name, "Ana");
        assert_eq!(
            orch.state(OperationKind::Create),
            OperationState::PartiallyFailed(CompositeStep::CreateDistributor)
        );
    }

    #[tokio::test]
    async fn test_retry_distributor_create() {
        let backend = FakeBackend::new();
        backend.fail_on(CompositeStep::CreateDistributor);
        let orch = orchestrator(&backend);
        let mut form = north_form();

        let zone_id = match orch.create_zone_with_distributor(&mut form).await {
            Err(CompositeError::Partial { zone_id, .. }) => zone_id,
            other => panic!("expected partial failure, got {other:?}"),
        };

        backend.fail.lock().clear();
        let distributor = orch.retry_distributor_create(zone_id, &mut form).await.unwrap();

        assert_eq!(distributor.zone_id, zone_id);
        let creates = backend
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateZone(_)))
            .count();
        assert_eq!(creates, 1);
        assert_eq!(backend.invalidation_count(), 2);
        assert_eq!(form, ZoneDistributorForm::default());
    }

    #[tokio::test]
    async fn test_create_reentry_refused_while_in_flight() {
        let backend = FakeBackend::new();
        let orch = orchestrator(&backend);

        let guard = orch.ops.begin(OperationKind::Create).unwrap();
        assert!(orch.is_processing(OperationKind::Create));

        let err = orch
            .create_zone_with_distributor(&mut north_form())
            .await
            .unwrap_err();
        assert!(matches!(err, CompositeError::InFlight(OperationKind::Create)));
        assert!(backend.calls().is_empty());

        // unrelated operations proceed
        backend.seed_zone(7, "Seven");
        let mut session = EditSession {
            target: Some(EditTarget::new(7, None)),
            form: ZoneDistributorForm {
                zone_name: "South".into(),
                ..Default::default()
            },
        };
        assert!(orch.update_zone_with_distributor(&mut session).await.is_ok());

        drop(guard);
        assert!(!orch.is_processing(OperationKind::Create));
    }

    // ==================== update ====================

    #[tokio::test]
    async fn test_update_without_distributor_only_updates_zone() {
        let backend = FakeBackend::new();
        backend.seed_zone(7, "Seven");
        let orch = orchestrator(&backend);

        let mut session = EditSession {
            target: Some(EditTarget::new(7, None)),
            form: ZoneDistributorForm {
                zone_name: "South".into(),
                distributor_name: "Ignored".into(),
                ..Default::default()
            },
        };
        let updated = orch.update_zone_with_distributor(&mut session).await.unwrap();

        assert_eq!(updated.zone.name, "South");
        assert!(updated.distributor.is_none());
        assert_eq!(
            backend.calls(),
            vec![Call::UpdateZone(
                7,
                ZoneUpdate {
                    name: Some("South".into()),
                    description: None,
                }
            )]
        );
        assert_eq!(backend.invalidation_count(), 1);
        assert!(!session.is_open());
    }

    #[tokio::test]
    async fn test_update_resends_zone_id() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        let orch = orchestrator(&backend);

        let mut session = EditSession {
            target: Some(EditTarget::new(3, Some(9))),
            form: ZoneDistributorForm {
                distributor_delivery_value: "20".into(),
                ..north_form()
            },
        };
        let updated = orch.update_zone_with_distributor(&mut session).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], Call::UpdateZone(3, _)));
        let Call::UpdateDistributor(9, payload) = &calls[1] else {
            panic!("expected distributor update, got {:?}", calls[1]);
        };
        assert_eq!(payload.zone_id, 3);
        assert_eq!(payload.delivery_value, 20.0);
        assert_eq!(updated.distributor.map(|d| d.zone_id), Some(3));
        assert_eq!(backend.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn test_update_without_target_is_noop() {
        let backend = FakeBackend::new();
        let orch = orchestrator(&backend);
        let mut session = EditSession {
            target: None,
            form: north_form(),
        };

        let err = orch.update_zone_with_distributor(&mut session).await.unwrap_err();

        assert!(matches!(err, CompositeError::NoTarget));
        assert!(backend.calls().is_empty());
        assert_eq!(backend.invalidation_count(), 0);
        assert_eq!(orch.state(OperationKind::Update), OperationState::Idle);
    }

    #[tokio::test]
    async fn test_update_distributor_failure_is_partial() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        backend.fail_on(CompositeStep::UpdateDistributor);
        let orch = orchestrator(&backend);

        let mut session = EditSession {
            target: Some(EditTarget::new(3, Some(9))),
            form: north_form(),
        };
        let err = orch.update_zone_with_distributor(&mut session).await.unwrap_err();

        assert!(err.is_partial());
        assert_eq!(err.failed_step(), Some(CompositeStep::UpdateDistributor));
        // form stays open for a retry
        assert!(session.is_open());
        assert_eq!(backend.invalidation_count(), 1);
    }

    #[tokio::test]
    async fn test_update_zone_failure_skips_distributor() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        backend.fail_on(CompositeStep::UpdateZone);
        let orch = orchestrator(&backend);

        let mut session = EditSession {
            target: Some(EditTarget::new(3, Some(9))),
            form: north_form(),
        };
        let err = orch.update_zone_with_distributor(&mut session).await.unwrap_err();

        assert_eq!(err.failed_step(), Some(CompositeStep::UpdateZone));
        assert_eq!(backend.calls().len(), 1);
        assert_eq!(backend.invalidation_count(), 0);
        assert_eq!(
            orch.state(OperationKind::Update),
            OperationState::Failed(CompositeStep::UpdateZone)
        );
    }

    // ==================== delete ====================

    #[tokio::test]
    async fn test_delete_distributor_before_zone() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        let orch = orchestrator(&backend);

        let outcome = orch
            .delete_zone_with_distributor(EditTarget::new(3, Some(9)), &yes)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(
            backend.calls(),
            vec![Call::DeleteDistributor(9), Call::DeleteZone(3)]
        );
        assert_eq!(backend.invalidation_count(), 1);
        assert!(orch.zones().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cancelled_makes_no_calls() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        let orch = orchestrator(&backend);

        let outcome = orch
            .delete_zone_with_distributor(EditTarget::new(3, Some(9)), &no)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(backend.calls().is_empty());
        assert_eq!(backend.invalidation_count(), 0);
        assert_eq!(orch.state(OperationKind::Delete), OperationState::Idle);
    }

    #[tokio::test]
    async fn test_delete_prompt_text() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        let orch = orchestrator(&backend);
        let seen = Mutex::new(None);

        let confirm = |prompt: &str| {
            *seen.lock() = Some(prompt.to_string());
            false
        };
        orch.delete_zone_with_distributor(EditTarget::new(3, None), &confirm)
            .await
            .unwrap();

        assert_eq!(seen.lock().as_deref(), Some(DELETE_PROMPT));
    }

    #[tokio::test]
    async fn test_delete_zone_without_distributor() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        let orch = orchestrator(&backend);

        orch.delete_zone_with_distributor(EditTarget::new(3, None), &yes)
            .await
            .unwrap();

        assert_eq!(backend.calls(), vec![Call::DeleteZone(3)]);
    }

    #[tokio::test]
    async fn test_delete_distributor_failure_keeps_zone() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        backend.fail_on(CompositeStep::DeleteDistributor);
        let orch = orchestrator(&backend);

        let err = orch
            .delete_zone_with_distributor(EditTarget::new(3, Some(9)), &yes)
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CompositeStep::DeleteDistributor));
        assert!(!err.is_partial());
        assert_eq!(backend.calls(), vec![Call::DeleteDistributor(9)]);
        assert_eq!(backend.invalidation_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_zone_failure_after_distributor_is_partial() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(9, 3);
        backend.fail_on(CompositeStep::DeleteZone);
        let orch = orchestrator(&backend);

        let err = orch
            .delete_zone_with_distributor(EditTarget::new(3, Some(9)), &yes)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CompositeError::Partial {
                completed: CompositeStep::DeleteDistributor,
                failed: CompositeStep::DeleteZone,
                zone_id: 3,
                ..
            }
        ));
        assert_eq!(backend.invalidation_count(), 1);
        assert_eq!(
            orch.state(OperationKind::Delete),
            OperationState::PartiallyFailed(CompositeStep::DeleteZone)
        );
    }

    fn zone_with_seeded_distributors(backend: &FakeBackend, id: i64) -> Zone {
        Zone {
            id,
            name: "North".into(),
            description: None,
            distributors: backend.distributors.lock().clone(),
        }
    }

    #[tokio::test]
    async fn test_delete_zone_with_several_distributors() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(4, 3);
        backend.seed_distributor(5, 3);
        let zone = zone_with_seeded_distributors(&backend, 3);
        let orch = orchestrator(&backend);

        let outcome = orch
            .delete_zone_with_distributor(EditTarget::from_zone(&zone), &yes)
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(
            backend.calls(),
            vec![
                Call::DeleteDistributor(4),
                Call::DeleteDistributor(5),
                Call::DeleteZone(3)
            ]
        );
        assert!(backend.distributors.lock().is_empty());
        assert!(orch.zones().list().await.unwrap().is_empty());
        assert_eq!(backend.invalidation_count(), 1);
        assert_eq!(orch.state(OperationKind::Delete), OperationState::Succeeded);
    }

    #[tokio::test]
    async fn test_delete_stops_when_second_distributor_fails() {
        let backend = FakeBackend::new();
        backend.seed_zone(3, "North");
        backend.seed_distributor(4, 3);
        backend.seed_distributor(5, 3);
        let zone = zone_with_seeded_distributors(&backend, 3);
        // removed elsewhere after the page loaded
        backend.distributors.lock().retain(|d| d.id != 5);
        let orch = orchestrator(&backend);

        let err = orch
            .delete_zone_with_distributor(EditTarget::from_zone(&zone), &yes)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CompositeError::Partial {
                completed: CompositeStep::DeleteDistributor,
                failed: CompositeStep::DeleteDistributor,
                zone_id: 3,
                source: ClientError::NotFound(_),
            }
        ));
        assert_eq!(
            backend.calls(),
            vec![Call::DeleteDistributor(4), Call::DeleteDistributor(5)]
        );
        assert_eq!(backend.invalidation_count(), 1);
        assert_eq!(
            orch.state(OperationKind::Delete),
            OperationState::PartiallyFailed(CompositeStep::DeleteDistributor)
        );
    }

    // ==================== targets ====================

    #[test]
    fn test_edit_target_from_zone_keeps_every_distributor() {
        let backend = FakeBackend::new();
        backend.seed_distributor(4, 1);
        backend.seed_distributor(5, 1);
        let zone = Zone {
            id: 1,
            name: "North".into(),
            description: None,
            distributors: backend.distributors.lock().clone(),
        };

        let target = EditTarget::from_zone(&zone);
        assert_eq!(target.distributor_id, Some(4));
        assert_eq!(target.extra_distributor_ids, vec![5]);
        assert_eq!(target.distributor_ids().collect::<Vec<_>>(), vec![4, 5]);

        let single = Zone {
            distributors: zone.distributors[..1].to_vec(),
            ..zone.clone()
        };
        assert_eq!(EditTarget::from_zone(&single), EditTarget::new(1, Some(4)));

        let empty = Zone {
            distributors: vec![],
            ..zone
        };
        assert_eq!(EditTarget::from_zone(&empty), EditTarget::new(1, None));
    }
}
