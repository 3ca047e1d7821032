//! # Types
//!
//! Core types for the reconciler.

use crate::controller::backoff::BackoffTracker;
use crate::controller::mapper::MapperError;
use crate::controller::store::{ClusterStore, StoreError};
use crate::dvls::VaultClient;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mapping(#[from] MapperError),
    #[error("Secret {namespace}/{name} already exists and is not managed by this DvlsSecret")]
    OwnershipConflict { namespace: String, name: String },
}

impl ReconcilerError {
    /// Permanent errors need an operator to change something before a retry can succeed
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Mapping(_) | Self::OwnershipConflict { .. } => true,
            Self::Store(e) => matches!(e, StoreError::OwnerLink { .. }),
        }
    }

    /// A concurrent write to the resource or its Secret; the next pass starts from fresh reads
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }

    /// Metric label for this error
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.is_permanent() {
            "permanent"
        } else {
            "transient"
        }
    }
}

/// Reconciliation context shared by every pass
pub struct Reconciler {
    pub(crate) store: Arc<dyn ClusterStore>,
    pub(crate) vault: Arc<dyn VaultClient>,
    pub(crate) requeue_interval: Duration,
    pub(crate) backoff: BackoffTracker,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("requeue_interval", &self.requeue_interval)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn ClusterStore>,
        vault: Arc<dyn VaultClient>,
        requeue_interval: Duration,
    ) -> Self {
        Self {
            store,
            vault,
            requeue_interval,
            backoff: BackoffTracker::new(),
        }
    }

    /// Per-resource failure backoff
    #[must_use]
    pub fn backoff(&self) -> &BackoffTracker {
        &self.backoff
    }
}
