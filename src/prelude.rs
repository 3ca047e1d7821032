//! # Prelude
//!
//! Re-exports commonly used types and traits.
//!
//! ```rust
//! use dvls_secret_controller::prelude::*;
//! ```

pub use crate::crd::*;

pub use crate::dvls::{Credential, VaultClient, VaultEntry, VaultError};

pub use crate::controller::reconciler::{reconcile, Reconciler, ReconcilerError};
pub use crate::controller::store::{ClusterStore, ObjectKey, StoreError};

pub use crate::config::{ControllerConfig, DvlsConnection};
