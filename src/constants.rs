//! # Constants
//!
//! Shared constants used throughout the controller.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Secret type marker for Kubernetes Secrets owned by this controller
pub const DVLS_SECRET_TYPE: &str = "devolutions.com/dvlssecret";

/// Condition type reported when the destination Secret mirrors the DVLS entry
pub const CONDITION_AVAILABLE: &str = "Available";

/// Condition type reported when the last reconciliation could not complete
pub const CONDITION_DEGRADED: &str = "Degraded";

/// Condition reason used while a resource is being reconciled
pub const REASON_RECONCILING: &str = "Reconciling";

/// Condition reason used when the DVLS entry subtype has no mapping
pub const REASON_UNSUPPORTED_SUBTYPE: &str = "UnsupportedSubtype";

/// Condition reason used when a foreign Secret already uses the destination name
pub const REASON_SECRET_CONFLICT: &str = "SecretConflict";

/// Annotation written by `dvlsctl reconcile` to trigger a reconciliation
pub const RECONCILE_ANNOTATION: &str = "dvls.devolutions.com/reconcile";

/// Field manager name used for status patches
pub const FIELD_MANAGER: &str = "dvls-secret-controller";

/// RFC3339 rendering of the zero timestamp ("never synced")
pub const ZERO_TIMESTAMP: &str = "0001-01-01T00:00:00Z";

/// Default requeue interval used to poll DVLS for entry changes (seconds)
pub const DEFAULT_REQUEUE_SECS: u64 = 60;

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default HTTP server startup timeout (how long to wait for server to be ready)
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Default HTTP server readiness poll interval
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Default timeout for requests sent to DVLS (seconds)
pub const DEFAULT_DVLS_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default exponential backoff starting value (milliseconds)
pub const DEFAULT_BACKOFF_START_MS: u64 = 1000;

/// Default exponential backoff maximum value (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Default delay before restarting watch stream after unknown errors (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_SECS: u64 = 5;

/// Default delay before restarting watch stream after it ends (seconds)
pub const DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS: u64 = 1;

/// Default maximum number of reconciliations running at once
pub const DEFAULT_MAX_CONCURRENT_RECONCILIATIONS: u16 = 10;

/// Fibonacci backoff floor for failing resources (minutes)
pub const BACKOFF_MIN_MINUTES: u64 = 1;

/// Fibonacci backoff ceiling for failing resources (minutes)
pub const BACKOFF_MAX_MINUTES: u64 = 10;
