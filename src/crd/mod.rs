//! # Custom Resource Definitions
//!
//! CRD types for the DVLS Secret Controller.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `DvlsSecret` and its spec
//! - `status.rs` - Status and condition types

mod spec;
mod status;

pub use spec::{DvlsSecret, DvlsSecretSpec};
pub use status::{Condition, ConditionStatus, DvlsSecretStatus};
