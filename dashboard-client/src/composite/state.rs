//! Per-operation processing state

use std::fmt;

use parking_lot::Mutex;

use super::CompositeError;

/// One backend call inside a composite operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeStep {
    CreateZone,
    CreateDistributor,
    UpdateZone,
    UpdateDistributor,
    DeleteDistributor,
    DeleteZone,
}

impl CompositeStep {
    /// Whether this step targets the distributor half
    pub fn is_distributor(&self) -> bool {
        matches!(
            self,
            Self::CreateDistributor | Self::UpdateDistributor | Self::DeleteDistributor
        )
    }
}

impl fmt::Display for CompositeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CreateZone => "zone creation",
            Self::CreateDistributor => "distributor creation",
            Self::UpdateZone => "zone update",
            Self::UpdateDistributor => "distributor update",
            Self::DeleteDistributor => "distributor deletion",
            Self::DeleteZone => "zone deletion",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Idle → InFlight → {Succeeded, PartiallyFailed, Failed}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    /// The named step failed after the other half was committed
    PartiallyFailed(CompositeStep),
    /// The named step failed and nothing was committed
    Failed(CompositeStep),
}

/// Processing flags, one per operation kind
#[derive(Debug, Default)]
pub(crate) struct OperationSlots {
    create: Mutex<OperationState>,
    update: Mutex<OperationState>,
    delete: Mutex<OperationState>,
}

impl OperationSlots {
    fn slot(&self, kind: OperationKind) -> &Mutex<OperationState> {
        match kind {
            OperationKind::Create => &self.create,
            OperationKind::Update => &self.update,
            OperationKind::Delete => &self.delete,
        }
    }

    pub(crate) fn get(&self, kind: OperationKind) -> OperationState {
        *self.slot(kind).lock()
    }

    /// Enter `InFlight`, refusing re-entry of the same kind
    pub(crate) fn begin(&self, kind: OperationKind) -> Result<InFlightGuard<'_>, CompositeError> {
        let slot = self.slot(kind);
        let mut state = slot.lock();
        if *state == OperationState::InFlight {
            return Err(CompositeError::InFlight(kind));
        }
        let previous = std::mem::replace(&mut *state, OperationState::InFlight);
        Ok(InFlightGuard {
            slot,
            previous,
            finished: false,
        })
    }
}

/// Clears the processing flag on every exit path
///
/// `finish` records the outcome; dropping without it (cancelled confirmation,
/// dropped future) restores the state from before `begin`.
#[must_use]
pub(crate) struct InFlightGuard<'a> {
    slot: &'a Mutex<OperationState>,
    previous: OperationState,
    finished: bool,
}

impl InFlightGuard<'_> {
    pub(crate) fn finish(mut self, outcome: OperationState) {
        *self.slot.lock() = outcome;
        self.finished = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.slot.lock() = self.previous;
        }
    }
}
