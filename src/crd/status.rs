//! # DvlsSecret Status
//!
//! Status types for tracking sync state and conditions.

use crate::constants::ZERO_TIMESTAMP;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the DvlsSecret resource
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DvlsSecretStatus {
    /// Conditions represent the latest available observations, at most one per type
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Modification time of the DVLS entry as of the last successful sync (RFC3339)
    ///
    /// `0001-01-01T00:00:00Z` means the entry was never synced.
    #[serde(default)]
    pub entry_modified_date: Option<String>,
}

impl DvlsSecretStatus {
    /// Status is uninitialized until both a condition and a sync timestamp exist
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        !self.conditions.is_empty() && self.entry_modified_date.is_some()
    }

    /// Last synced modification time, `None` for the zero value or an unparseable one
    #[must_use]
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.entry_modified_date
            .as_deref()
            .filter(|raw| *raw != ZERO_TIMESTAMP)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|t| t.with_timezone(&Utc))
    }

    /// Record the sync timestamp; `None` stores the zero value
    pub fn set_last_synced(&mut self, modified_on: Option<DateTime<Utc>>) {
        self.entry_modified_date = Some(match modified_on {
            Some(t) => t.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true),
            None => ZERO_TIMESTAMP.to_string(),
        });
    }

    #[must_use]
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.r#type == condition_type)
    }
}

/// Status of a condition
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, schemars::JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Condition represents an observation of the resource's state
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Available, Degraded)
    pub r#type: String,
    /// Status of the condition
    pub status: ConditionStatus,
    /// Last time the status changed (RFC3339)
    #[serde(default)]
    pub last_transition_time: Option<String>,
    /// Machine-readable reason
    #[serde(default)]
    pub reason: Option<String>,
    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}
