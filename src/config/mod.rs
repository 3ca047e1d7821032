//! # Configuration
//!
//! Controller settings loaded from the environment.
//!
//! - [`controller`] - `ControllerConfig` and its environment loader
//! - [`duration`] - parsing of requeue interval strings such as `1m30s`

pub mod controller;
pub mod duration;

pub use controller::{ConfigError, ControllerConfig, DvlsConnection};
pub use duration::parse_requeue_duration;
