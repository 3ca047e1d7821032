//! # Reconciler
//!
//! Core reconciliation logic for `DvlsSecret` resources.
//!
//! The reconciler:
//! - Watches `DvlsSecret` resources across all namespaces
//! - Fetches the referenced entry from DVLS on every pass
//! - Creates or updates the Secret with the same name and namespace
//! - Reports sync health through the `Available` and `Degraded` conditions
//!
//! The Kubernetes API and DVLS are reached through the [`ClusterStore`] and
//! [`VaultClient`] traits, so a pass can be driven entirely in memory.
//!
//! [`ClusterStore`]: crate::controller::store::ClusterStore
//! [`VaultClient`]: crate::dvls::VaultClient

pub mod reconcile;
mod status;
pub mod types;

pub use reconcile::reconcile;
pub use types::{Reconciler, ReconcilerError};
