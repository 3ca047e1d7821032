//! # Duration Parsing
//!
//! Parses the requeue interval configured through `DEVO_OPERATOR_REQUEUE_DURATION`.
//!
//! Accepts one or more `<number><unit>` segments with units `ms`, `s`, `m`, `h`,
//! e.g. `"500ms"`, `"90s"`, `"1m30s"`, `"2h"`.

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static SEGMENT_REGEX: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"(?P<number>\d+)(?P<unit>ms|s|m|h)"));

/// Parse a compound duration string into a `Duration`
///
/// The whole string must be made of segments; stray characters are rejected.
/// A total of zero is rejected because it would requeue in a hot loop.
pub fn parse_requeue_duration(duration_str: &str) -> Result<Duration> {
    let trimmed = duration_str.trim();

    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("Duration string cannot be empty"));
    }

    let regex = SEGMENT_REGEX
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to compile regex: {e}"))?;

    let lower = trimmed.to_lowercase();
    let mut total = Duration::ZERO;
    let mut consumed = 0;

    for captures in regex.captures_iter(&lower) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        if whole.start() != consumed {
            break;
        }
        consumed = whole.end();

        let number: u64 = captures["number"]
            .parse()
            .with_context(|| format!("Invalid duration number in '{trimmed}'"))?;

        let segment = match &captures["unit"] {
            "ms" => Duration::from_millis(number),
            "s" => Duration::from_secs(number),
            "m" => Duration::from_secs(number.saturating_mul(60)),
            "h" => Duration::from_secs(number.saturating_mul(3600)),
            unit => {
                return Err(anyhow::anyhow!(
                    "Invalid unit '{unit}' in duration '{trimmed}'. Expected: ms, s, m, or h"
                ));
            }
        };
        total = total.saturating_add(segment);
    }

    if consumed != lower.len() {
        return Err(anyhow::anyhow!(
            "Invalid duration format '{trimmed}'. Expected segments like '90s', '1m30s' or '2h'"
        ));
    }

    if total.is_zero() {
        return Err(anyhow::anyhow!(
            "Duration must be greater than 0, got '{trimmed}'"
        ));
    }

    Ok(total)
}
