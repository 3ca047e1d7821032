//! # Error Policy
//!
//! Error handling and backoff logic for the controller watch loop.
//! This module handles reconciliation errors and watch stream errors.

use crate::controller::reconciler::{Reconciler, ReconcilerError};
use crate::crd::DvlsSecret;
use kube_runtime::controller::Action;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Handle reconciliation errors with per-resource Fibonacci backoff
///
/// Backoff state is tracked per resource so one failing `DvlsSecret` does not
/// slow down retries of the others.
pub fn handle_reconciliation_error(
    obj: Arc<DvlsSecret>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let resource_key = obj.resource_key();

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.key = resource_key.as_str(),
        error.class = error.class(),
        error = %error
    );
    let _error_guard = error_span.enter();

    if error.is_permanent() {
        error!(
            "Reconciliation of {} needs operator action: {}",
            resource_key, error
        );
    } else if error.is_conflict() {
        info!(
            "{} was modified concurrently, re-running the pass: {}",
            resource_key, error
        );
    } else {
        warn!("Reconciliation of {} failed: {}", resource_key, error);
    }

    let (delay, error_count) = ctx.backoff().record_failure(&resource_key);
    info!(
        "Retrying {} with Fibonacci backoff in {}s (error count: {})",
        resource_key,
        delay.as_secs(),
        error_count
    );

    Action::requeue(delay)
}

/// Kinds of watch stream failures, each with its own restart strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchErrorKind {
    Unauthorized,
    Expired,
    TooManyRequests,
    NotFound,
    Other,
}

/// Classify a watch error from its debug rendering
///
/// 404 is checked first: a plain-text 404 body surfaces as a decode error
/// whose chain can also mention `WatchFailed`.
#[must_use]
pub fn classify_watch_error(error_string: &str) -> WatchErrorKind {
    let is_not_found = error_string.contains("ObjectNotFound")
        || error_string.contains("404")
        || error_string.contains("not found");
    if is_not_found {
        return WatchErrorKind::NotFound;
    }
    if error_string.contains("401") || error_string.contains("Unauthorized") {
        return WatchErrorKind::Unauthorized;
    }
    if error_string.contains("410")
        || error_string.contains("too old resource version")
        || error_string.contains("Expired")
        || error_string.contains("Gone")
    {
        return WatchErrorKind::Expired;
    }
    if error_string.contains("429")
        || error_string.contains("storage is (re)initializing")
        || error_string.contains("TooManyRequests")
    {
        return WatchErrorKind::TooManyRequests;
    }
    WatchErrorKind::Other
}

/// Handle a watch stream error
///
/// Returns `true` to keep the event in the stream, `false` to drop it and let
/// the watch restart.
pub async fn handle_watch_stream_error(
    error_string: &str,
    backoff_ms: &AtomicU64,
    max_backoff_ms: u64,
    watch_restart_delay: Duration,
) -> bool {
    let error_span = tracing::span!(
        tracing::Level::WARN,
        "controller.watch.error",
        error = %error_string
    );

    match classify_watch_error(error_string) {
        WatchErrorKind::Unauthorized => {
            error_span.in_scope(|| {
                error!(
                    "Watch authentication failed (401 Unauthorized), RBAC may have been revoked or the token expired"
                );
                error!("Check that the controller ServiceAccount can list and watch dvlssecrets and secrets");
                warn!(
                    "Waiting {}s before retrying watch",
                    watch_restart_delay.as_secs()
                );
            });
            tokio::time::sleep(watch_restart_delay).await;
            false
        }
        WatchErrorKind::Expired => {
            error_span.in_scope(|| {
                warn!("Watch resource version expired (410), watch will restart");
            });
            false
        }
        WatchErrorKind::TooManyRequests => {
            let current = backoff_ms.load(Ordering::Relaxed);
            error_span.in_scope(|| {
                warn!(
                    "API server storage reinitializing (429), backing off for {}ms before restart",
                    current
                );
            });
            tokio::time::sleep(Duration::from_millis(current)).await;
            backoff_ms.store(
                std::cmp::min(current.saturating_mul(2), max_backoff_ms),
                Ordering::Relaxed,
            );
            false
        }
        WatchErrorKind::NotFound => {
            error_span.in_scope(|| {
                warn!(
                    "Resource not found (404), normal if a resource was deleted or the CRD is missing: {}",
                    error_string
                );
            });
            true
        }
        WatchErrorKind::Other => {
            error_span.in_scope(|| {
                error!("Controller stream error: {}", error_string);
            });
            tokio::time::sleep(watch_restart_delay).await;
            false
        }
    }
}
