//! DVLS Secret Controller Library
//!
//! Mirrors Devolutions Server (DVLS) credential entries into Kubernetes
//! Secrets. A `DvlsSecret` resource names a vault and an entry; the
//! controller keeps a Secret with the same name in sync with that entry.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod dvls;
pub mod observability;
pub mod prelude;
pub mod runtime;
