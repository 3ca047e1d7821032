//! # Sync Decision
//!
//! Decides whether the destination Secret must be rewritten.

use chrono::{DateTime, Utc};

/// Returns `false` only when the Secret exists and the last synced
/// modification time equals the entry's current one exactly.
///
/// `last_synced == None` stands for the zero timestamp ("never synced").
/// An entry without a modification time always syncs, and so does a time
/// that moved backwards.
#[must_use]
pub fn needs_sync(
    last_synced: Option<DateTime<Utc>>,
    vault_modified_on: Option<DateTime<Utc>>,
    secret_exists: bool,
) -> bool {
    if !secret_exists {
        return true;
    }
    match (last_synced, vault_modified_on) {
        (Some(last), Some(current)) => last != current,
        // Zero or missing on either side never compares equal, so an entry
        // without `modifiedOn` rewrites the Secret and status on every pass.
        // The Secret content stays identical across those rewrites.
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_skip_when_equal_and_secret_exists() {
        assert!(!needs_sync(Some(t()), Some(t()), true));
    }

    #[test]
    fn test_missing_secret_always_syncs() {
        assert!(needs_sync(Some(t()), Some(t()), false));
    }

    #[test]
    fn test_never_synced_always_syncs() {
        assert!(needs_sync(None, Some(t()), true));
        assert!(needs_sync(None, None, true));
    }

    #[test]
    fn test_any_difference_syncs() {
        assert!(needs_sync(Some(t()), Some(t() + Duration::seconds(1)), true));
        // Backwards-moving time is still a change
        assert!(needs_sync(Some(t()), Some(t() - Duration::days(1)), true));
        assert!(needs_sync(Some(t()), None, true));
    }
}
