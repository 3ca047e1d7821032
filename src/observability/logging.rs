//! # Logging
//!
//! Tracing subscriber setup driven by `LOG_LEVEL` and `LOG_FORMAT`.
//! `RUST_LOG`, when set, takes precedence over `LOG_LEVEL`.

use crate::config::ControllerConfig;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `LOG_LEVEL` value
#[must_use]
pub fn default_directive(log_level: &str) -> String {
    let level = match log_level.to_ascii_lowercase().as_str() {
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };
    format!("dvls_secret_controller={level}")
}

/// Install the global tracing subscriber
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &ControllerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level)));

    let result = if config.log_format.eq_ignore_ascii_case("text") {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_maps_levels() {
        assert_eq!(default_directive("INFO"), "dvls_secret_controller=info");
        assert_eq!(default_directive("Debug"), "dvls_secret_controller=debug");
        assert_eq!(default_directive("WARNING"), "dvls_secret_controller=warn");
        assert_eq!(default_directive("bogus"), "dvls_secret_controller=info");
    }
}
