//! # Controller Configuration
//!
//! Controller-level settings loaded from environment variables.

use crate::config::duration::parse_requeue_duration;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use zeroize::Zeroizing;

/// Environment variable holding the DVLS base URL
pub const ENV_DVLS_BASE_URI: &str = "DEVO_OPERATOR_DVLS_BASEURI";
/// Environment variable holding the DVLS application key
pub const ENV_DVLS_APP_ID: &str = "DEVO_OPERATOR_DVLS_APPID";
/// Environment variable holding the DVLS application secret
pub const ENV_DVLS_APP_SECRET: &str = "DEVO_OPERATOR_DVLS_APPSECRET";
/// Environment variable holding the sync re-check interval
pub const ENV_REQUEUE_DURATION: &str = "DEVO_OPERATOR_REQUEUE_DURATION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Controller-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Interval between two checks of the same DVLS entry
    pub requeue_interval: Duration,
    /// HTTP server port for metrics and probes
    pub metrics_port: u16,
    /// Global log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub log_level: String,
    /// Log format (json, text)
    pub log_format: String,
    /// Maximum concurrent reconciliations
    pub max_concurrent_reconciliations: u16,
    /// Watch restart backoff starting value (milliseconds)
    pub backoff_start_ms: u64,
    /// Watch restart backoff maximum value (milliseconds)
    pub backoff_max_ms: u64,
    /// Watch stream restart delay after unknown errors (seconds)
    pub watch_restart_delay_secs: u64,
    /// Watch stream restart delay after the stream ends (seconds)
    pub watch_restart_delay_after_end_secs: u64,
    /// Timeout applied to every DVLS request (seconds)
    pub dvls_request_timeout_secs: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        use crate::constants::*;
        Self {
            requeue_interval: Duration::from_secs(DEFAULT_REQUEUE_SECS),
            metrics_port: DEFAULT_METRICS_PORT,
            log_level: "INFO".to_string(),
            log_format: "json".to_string(),
            max_concurrent_reconciliations: DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            backoff_start_ms: DEFAULT_BACKOFF_START_MS,
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            watch_restart_delay_secs: DEFAULT_WATCH_RESTART_DELAY_SECS,
            watch_restart_delay_after_end_secs: DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS,
            dvls_request_timeout_secs: DEFAULT_DVLS_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    ///
    /// Only the requeue interval can fail: a malformed value is reported
    /// instead of silently falling back, since it changes how often DVLS is polled.
    pub fn from_env() -> Result<Self, ConfigError> {
        use crate::constants::*;

        let requeue_interval = match std::env::var(ENV_REQUEUE_DURATION) {
            Ok(raw) if !raw.trim().is_empty() => {
                parse_requeue_duration(&raw).map_err(|e| ConfigError::Invalid {
                    name: ENV_REQUEUE_DURATION,
                    reason: e.to_string(),
                })?
            }
            _ => Duration::from_secs(DEFAULT_REQUEUE_SECS),
        };

        Ok(Self {
            requeue_interval,
            metrics_port: env_var_or_default("METRICS_PORT", DEFAULT_METRICS_PORT),
            log_level: env_var_or_default_str("LOG_LEVEL", "INFO"),
            log_format: env_var_or_default_str("LOG_FORMAT", "json"),
            max_concurrent_reconciliations: env_var_or_default(
                "MAX_CONCURRENT_RECONCILIATIONS",
                DEFAULT_MAX_CONCURRENT_RECONCILIATIONS,
            ),
            backoff_start_ms: env_var_or_default("BACKOFF_START_MS", DEFAULT_BACKOFF_START_MS),
            backoff_max_ms: env_var_or_default("BACKOFF_MAX_MS", DEFAULT_BACKOFF_MAX_MS),
            watch_restart_delay_secs: env_var_or_default(
                "WATCH_RESTART_DELAY_SECS",
                DEFAULT_WATCH_RESTART_DELAY_SECS,
            ),
            watch_restart_delay_after_end_secs: env_var_or_default(
                "WATCH_RESTART_DELAY_AFTER_END_SECS",
                DEFAULT_WATCH_RESTART_DELAY_AFTER_END_SECS,
            ),
            dvls_request_timeout_secs: env_var_or_default(
                "DVLS_REQUEST_TIMEOUT_SECS",
                DEFAULT_DVLS_REQUEST_TIMEOUT_SECS,
            ),
        })
    }

    pub fn watch_restart_delay_duration(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_secs)
    }

    pub fn watch_restart_delay_after_end_duration(&self) -> Duration {
        Duration::from_secs(self.watch_restart_delay_after_end_secs)
    }

    pub fn dvls_request_timeout(&self) -> Duration {
        Duration::from_secs(self.dvls_request_timeout_secs)
    }
}

/// Connection settings for the DVLS instance
///
/// The application secret is wiped from memory on drop and never printed.
#[derive(Clone)]
pub struct DvlsConnection {
    pub base_uri: String,
    pub app_id: String,
    pub app_secret: Zeroizing<String>,
}

impl fmt::Debug for DvlsConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DvlsConnection")
            .field("base_uri", &self.base_uri)
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .finish()
    }
}

impl DvlsConnection {
    /// Load DVLS connection settings; all three variables are required
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_uri = required_env(ENV_DVLS_BASE_URI)?;
        let app_id = required_env(ENV_DVLS_APP_ID)?;
        let app_secret = Zeroizing::new(required_env(ENV_DVLS_APP_SECRET)?);

        if !(base_uri.starts_with("http://") || base_uri.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: ENV_DVLS_BASE_URI,
                reason: format!("'{base_uri}' is not an http(s) URL"),
            });
        }

        Ok(Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            app_id,
            app_secret,
        })
    }
}

fn required_env(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.requeue_interval, Duration::from_secs(60));
        assert_eq!(config.metrics_port, 8080);
        assert_eq!(config.max_concurrent_reconciliations, 10);
        assert_eq!(config.log_format, "json");
        assert_eq!(config.dvls_request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_connection_debug_redacts_secret() {
        let connection = DvlsConnection {
            base_uri: "https://dvls.example.com".to_string(),
            app_id: "app-id".to_string(),
            app_secret: Zeroizing::new("super-secret-value".to_string()),
        };

        let rendered = format!("{connection:?}");
        assert!(rendered.contains("app-id"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn test_env_var_or_default_uses_default_when_unset() {
        let key = "DVLS_CONTROLLER_TEST_UNSET_PORT";
        assert_eq!(env_var_or_default(key, 8080_u16), 8080);
    }
}
