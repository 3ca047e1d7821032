//! # Controller
//!
//! Core controller modules for the DVLS Secret Controller.
//!
//! - `backoff`: Fibonacci backoff for failing resources
//! - `conditions`: status condition bookkeeping
//! - `mapper`: DVLS entry to Secret data mapping
//! - `reconciler`: Core reconciliation logic
//! - `server`: HTTP server for metrics and health checks
//! - `store`: Kubernetes operations used by the reconciler
//! - `sync`: sync decision

pub mod backoff;
pub mod conditions;
pub mod mapper;
pub mod reconciler;
pub mod server;
pub mod store;
pub mod sync;
