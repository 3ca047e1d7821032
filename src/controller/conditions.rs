//! # Status Conditions
//!
//! Upsert and removal of named conditions on a `DvlsSecret` status.
//! At most one condition per type is kept; `lastTransitionTime` only moves
//! when the status value changes.

use crate::crd::{Condition, ConditionStatus};
use chrono::{DateTime, SecondsFormat, Utc};

/// Insert or update the condition of type `condition_type`
pub fn set_condition(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) {
    set_condition_at(conditions, condition_type, status, reason, message, Utc::now());
}

/// Same as [`set_condition`] with an explicit clock
pub fn set_condition_at(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
    now: DateTime<Utc>,
) {
    let timestamp = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    if let Some(existing) = conditions.iter_mut().find(|c| c.r#type == condition_type) {
        if existing.status != status {
            existing.status = status;
            existing.last_transition_time = Some(timestamp);
        }
        existing.reason = Some(reason.to_string());
        existing.message = Some(message.to_string());
        return;
    }

    conditions.push(Condition {
        r#type: condition_type.to_string(),
        status,
        last_transition_time: Some(timestamp),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
    });
}

/// Remove the condition of type `condition_type`, if present
pub fn remove_condition(conditions: &mut Vec<Condition>, condition_type: &str) {
    conditions.retain(|c| c.r#type != condition_type);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CONDITION_AVAILABLE, CONDITION_DEGRADED};
    use chrono::TimeZone;

    #[test]
    fn test_set_appends_new_condition() {
        let mut conditions = Vec::new();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        set_condition_at(
            &mut conditions,
            CONDITION_AVAILABLE,
            ConditionStatus::Unknown,
            "Reconciling",
            "Starting reconciliation",
            now,
        );

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].status, ConditionStatus::Unknown);
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-05-01T08:00:00Z")
        );
    }

    #[test]
    fn test_transition_time_only_moves_on_status_change() {
        let mut conditions = Vec::new();
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        set_condition_at(&mut conditions, CONDITION_AVAILABLE, ConditionStatus::True, "Synced", "a", t0);
        set_condition_at(&mut conditions, CONDITION_AVAILABLE, ConditionStatus::True, "Synced", "b", t1);

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].message.as_deref(), Some("b"));
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-05-01T08:00:00Z")
        );

        set_condition_at(&mut conditions, CONDITION_AVAILABLE, ConditionStatus::False, "Failed", "c", t2);
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-05-01T10:00:00Z")
        );
    }

    #[test]
    fn test_remove_condition() {
        let mut conditions = Vec::new();
        set_condition(&mut conditions, CONDITION_AVAILABLE, ConditionStatus::True, "Synced", "");
        set_condition(&mut conditions, CONDITION_DEGRADED, ConditionStatus::True, "Reconciling", "");

        remove_condition(&mut conditions, CONDITION_DEGRADED);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].r#type, CONDITION_AVAILABLE);

        // Absent type is a no-op
        remove_condition(&mut conditions, CONDITION_DEGRADED);
        assert_eq!(conditions.len(), 1);
    }
}
