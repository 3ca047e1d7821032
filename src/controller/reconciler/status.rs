//! # Status Updates
//!
//! Status transitions written by a reconciliation pass.

use crate::constants::{CONDITION_AVAILABLE, CONDITION_DEGRADED, REASON_RECONCILING};
use crate::controller::conditions::{remove_condition, set_condition};
use crate::crd::{ConditionStatus, DvlsSecret, DvlsSecretStatus};
use chrono::{DateTime, Utc};

/// Placeholder written the first time a resource is seen
pub(crate) fn mark_initializing(resource: &mut DvlsSecret) {
    let status = resource.status.get_or_insert_with(DvlsSecretStatus::default);
    set_condition(
        &mut status.conditions,
        CONDITION_AVAILABLE,
        ConditionStatus::Unknown,
        REASON_RECONCILING,
        "Starting reconciliation",
    );
    status.set_last_synced(None);
}

pub(crate) fn mark_degraded(resource: &mut DvlsSecret, reason: &str, message: &str) {
    let status = resource.status.get_or_insert_with(DvlsSecretStatus::default);
    set_condition(
        &mut status.conditions,
        CONDITION_DEGRADED,
        ConditionStatus::True,
        reason,
        message,
    );
}

/// Returns `true` when a Degraded condition was present
pub(crate) fn clear_degraded(resource: &mut DvlsSecret) -> bool {
    let Some(status) = resource.status.as_mut() else {
        return false;
    };
    let before = status.conditions.len();
    remove_condition(&mut status.conditions, CONDITION_DEGRADED);
    status.conditions.len() != before
}

pub(crate) fn mark_synced(resource: &mut DvlsSecret, modified_on: Option<DateTime<Utc>>) {
    let status = resource.status.get_or_insert_with(DvlsSecretStatus::default);
    set_condition(
        &mut status.conditions,
        CONDITION_AVAILABLE,
        ConditionStatus::True,
        REASON_RECONCILING,
        "Secret is in sync with the DVLS entry",
    );
    remove_condition(&mut status.conditions, CONDITION_DEGRADED);
    status.set_last_synced(modified_on);
}
