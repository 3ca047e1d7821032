//! # Fibonacci Backoff
//!
//! Progressive backoff for resources whose reconciliation keeps failing.
//!
//! The sequence is calculated in minutes and grows more slowly than an
//! exponential backoff: 1m, 1m, 2m, 3m, 5m, 8m, 10m (max).
//!
//! Each `DvlsSecret` gets its own backoff state, keyed by `namespace/name`,
//! so one failing resource never delays the retries of another.
//!
//! ```rust
//! use dvls_secret_controller::controller::backoff::FibonacciBackoff;
//!
//! let mut backoff = FibonacciBackoff::new(1, 10);
//! assert_eq!(backoff.next_backoff_seconds(), 60);
//! assert_eq!(backoff.next_backoff_seconds(), 60);
//! assert_eq!(backoff.next_backoff_seconds(), 120);
//! ```

use crate::constants::{BACKOFF_MAX_MINUTES, BACKOFF_MIN_MINUTES};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Fibonacci backoff calculator
#[derive(Debug, Clone)]
pub struct FibonacciBackoff {
    min_minutes: u64,
    prev_minutes: u64,
    current_minutes: u64,
    max_minutes: u64,
}

impl FibonacciBackoff {
    /// Create a new backoff bounded by `min_minutes` and `max_minutes`
    #[must_use]
    pub fn new(min_minutes: u64, max_minutes: u64) -> Self {
        Self {
            min_minutes,
            prev_minutes: 0,
            current_minutes: min_minutes,
            max_minutes,
        }
    }

    /// Return the current backoff in seconds and advance the sequence
    pub fn next_backoff_seconds(&mut self) -> u64 {
        let result_seconds = self.current_minutes * 60;

        let next_minutes = self.prev_minutes + self.current_minutes;
        self.prev_minutes = self.current_minutes;
        self.current_minutes = std::cmp::min(next_minutes, self.max_minutes);

        result_seconds
    }

    /// Same as [`next_backoff_seconds`](Self::next_backoff_seconds) as a `Duration`
    #[must_use]
    pub fn next_backoff(&mut self) -> Duration {
        Duration::from_secs(self.next_backoff_seconds())
    }

    /// Restart the sequence from the minimum
    pub fn reset(&mut self) {
        self.prev_minutes = 0;
        self.current_minutes = self.min_minutes;
    }
}

/// Backoff state for a single resource
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl Default for BackoffState {
    fn default() -> Self {
        Self {
            backoff: FibonacciBackoff::new(BACKOFF_MIN_MINUTES, BACKOFF_MAX_MINUTES),
            error_count: 0,
        }
    }
}

/// Per-resource backoff bookkeeping shared by the reconciler and the error policy
///
/// The lock is only ever held for the duration of a map lookup, never across
/// an `.await`.
#[derive(Debug, Default)]
pub struct BackoffTracker {
    states: Mutex<HashMap<String, BackoffState>>,
}

impl BackoffTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `resource_key` and return `(delay, error_count)`
    pub fn record_failure(&self, resource_key: &str) -> (Duration, u32) {
        match self.states.lock() {
            Ok(mut states) => {
                let state = states.entry(resource_key.to_string()).or_default();
                state.error_count += 1;
                (state.backoff.next_backoff(), state.error_count)
            }
            Err(e) => {
                warn!("Failed to lock backoff states: {}, using default backoff", e);
                (Duration::from_secs(BACKOFF_MIN_MINUTES * 60), 0)
            }
        }
    }

    /// Forget any failure history for `resource_key`
    pub fn reset(&self, resource_key: &str) {
        if let Ok(mut states) = self.states.lock() {
            states.remove(resource_key);
        }
    }

    /// Number of consecutive failures recorded for `resource_key`
    #[must_use]
    pub fn error_count(&self, resource_key: &str) -> u32 {
        self.states
            .lock()
            .ok()
            .and_then(|states| states.get(resource_key).map(|s| s.error_count))
            .unwrap_or(0)
    }
}
