use thiserror::Error;

use super::{CompositeStep, OperationKind};
use crate::ClientError;
use crate::form::FormError;

#[derive(Debug, Error)]
pub enum CompositeError {
    /// Rejected before any backend call
    #[error("invalid input: {0}")]
    Validation(#[from] FormError),

    /// A step failed and nothing was committed
    #[error("{step} failed: {source}")]
    Transport {
        step: CompositeStep,
        #[source]
        source: ClientError,
    },

    /// `completed` was committed, then `failed` failed
    #[error("{completed} succeeded but {failed} failed (zone {zone_id}): {source}")]
    Partial {
        completed: CompositeStep,
        failed: CompositeStep,
        zone_id: i64,
        #[source]
        source: ClientError,
    },

    /// No zone selected for the operation
    #[error("no zone selected")]
    NoTarget,

    #[error("a {0} operation is already in progress")]
    InFlight(OperationKind),
}

impl CompositeError {
    /// The step that failed, if a backend call was made
    pub fn failed_step(&self) -> Option<CompositeStep> {
        match self {
            Self::Transport { step, .. } => Some(*step),
            Self::Partial { failed, .. } => Some(*failed),
            _ => None,
        }
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }

    /// Underlying store error, if any
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Transport { source, .. } | Self::Partial { source, .. } => Some(source),
            _ => None,
        }
    }
}
