//! # Metrics
//!
//! Prometheus metrics for monitoring the controller.
//!
//! ## Metrics Exposed
//!
//! - `dvls_secret_reconciliations_total` - Total number of reconciliation passes
//! - `dvls_secret_reconciliation_errors_total` - Failed passes, labelled by error class
//! - `dvls_secret_reconciliation_duration_seconds` - Duration of reconciliation passes
//! - `dvls_secret_secrets_created_total` - Destination Secrets created
//! - `dvls_secret_secrets_updated_total` - Destination Secrets rewritten after an entry change
//! - `dvls_secret_syncs_skipped_total` - Passes where the entry was unchanged
//! - `dvls_secret_vault_fetch_failures_total` - Failed DVLS entry fetches

use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dvls_secret_reconciliations_total",
        "Total number of reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "dvls_secret_reconciliation_errors_total",
            "Total number of reconciliation errors",
        ),
        &["class"],
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "dvls_secret_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static SECRETS_CREATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dvls_secret_secrets_created_total",
        "Total number of destination Secrets created",
    )
    .expect("Failed to create SECRETS_CREATED_TOTAL metric - this should never happen")
});

static SECRETS_UPDATED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dvls_secret_secrets_updated_total",
        "Total number of destination Secrets updated from DVLS",
    )
    .expect("Failed to create SECRETS_UPDATED_TOTAL metric - this should never happen")
});

static SYNCS_SKIPPED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dvls_secret_syncs_skipped_total",
        "Total number of passes where the DVLS entry was unchanged",
    )
    .expect("Failed to create SYNCS_SKIPPED_TOTAL metric - this should never happen")
});

static VAULT_FETCH_FAILURES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "dvls_secret_vault_fetch_failures_total",
        "Total number of failed DVLS entry fetches",
    )
    .expect("Failed to create VAULT_FETCH_FAILURES_TOTAL metric - this should never happen")
});

pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(SECRETS_CREATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SECRETS_UPDATED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(SYNCS_SKIPPED_TOTAL.clone()))?;
    REGISTRY.register(Box::new(VAULT_FETCH_FAILURES_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

/// `class` is `permanent` or `transient`
pub fn increment_reconciliation_errors(class: &str) {
    RECONCILIATION_ERRORS_TOTAL.with_label_values(&[class]).inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

pub fn increment_secrets_created() {
    SECRETS_CREATED_TOTAL.inc();
}

pub fn increment_secrets_updated() {
    SECRETS_UPDATED_TOTAL.inc();
}

pub fn increment_syncs_skipped() {
    SYNCS_SKIPPED_TOTAL.inc();
}

pub fn increment_vault_fetch_failures() {
    VAULT_FETCH_FAILURES_TOTAL.inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_increment_reconciliations() {
        let before = RECONCILIATIONS_TOTAL.get();
        increment_reconciliations();
        assert!(RECONCILIATIONS_TOTAL.get() > before);
    }

    #[test]
    fn test_reconciliation_errors_are_labelled() {
        let before = RECONCILIATION_ERRORS_TOTAL
            .with_label_values(&["permanent"])
            .get();
        increment_reconciliation_errors("permanent");
        let after = RECONCILIATION_ERRORS_TOTAL
            .with_label_values(&["permanent"])
            .get();
        assert!(after > before);
    }

    #[test]
    fn test_sync_counters() {
        let created = SECRETS_CREATED_TOTAL.get();
        let skipped = SYNCS_SKIPPED_TOTAL.get();
        increment_secrets_created();
        increment_syncs_skipped();
        assert!(SECRETS_CREATED_TOTAL.get() > created);
        assert!(SYNCS_SKIPPED_TOTAL.get() > skipped);
    }
}
