//! # Runtime
//!
//! Controller process lifecycle.
//!
//! - `initialization`: startup sequence
//! - `watch_loop`: kube-runtime controller with automatic restart
//! - `error_policy`: reconciliation and watch error handling

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, InitializationResult};
pub use watch_loop::run_watch_loop;
