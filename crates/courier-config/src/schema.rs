//! Configuration schema types.
//!
//! This module defines the structure of each configuration section.

use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

/// Upper bound accepted for `driver.max_redirects`.
pub const MAX_REDIRECT_LIMIT: usize = 20;

/// Driver configuration section.
///
/// Controls where the driver sends requests and how it treats redirects.
///
/// # Example
///
/// ```
/// use courier_config::DriverConfig;
///
/// let config = DriverConfig::new("http://127.0.0.1:3000").no_follow();
/// assert!(!config.follow_redirects);
/// assert_eq!(config.max_redirects, 5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Base URL that relative request paths are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Follow 3xx responses that carry a `Location` header.
    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    /// Maximum number of redirect hops followed for one request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Per-hop request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headers sent with every request unless the caller overrides them.
    #[serde(default)]
    pub default_headers: IndexMap<String, String>,

    /// Hosts that redirects may leave the base URL's origin for.
    #[serde(default)]
    pub allowed_redirect_hosts: Vec<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            follow_redirects: true,
            max_redirects: default_max_redirects(),
            timeout_ms: default_timeout_ms(),
            default_headers: IndexMap::new(),
            allowed_redirect_hosts: Vec::new(),
        }
    }
}

impl DriverConfig {
    /// Default configuration pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Disable redirect following.
    #[must_use]
    pub fn no_follow(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Per-hop request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Checks the section's limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The base URL is not an absolute `http` URL (the transport has no TLS)
    /// - `max_redirects` exceeds [`MAX_REDIRECT_LIMIT`]
    /// - The timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::invalid_value("driver.base_url", format!("{}: {e}", self.base_url))
        })?;
        if base.scheme() != "http" {
            return Err(ConfigError::invalid_value(
                "driver.base_url",
                format!("unsupported scheme: {}", base.scheme()),
            ));
        }

        if self.max_redirects > MAX_REDIRECT_LIMIT {
            return Err(ConfigError::invalid_value(
                "driver.max_redirects",
                format!("must be at most {MAX_REDIRECT_LIMIT}"),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "driver.timeout_ms",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:9292".to_string()
}

fn default_max_redirects() -> usize {
    5
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// JSON formatted logs (CI log collectors).
    Json,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or `EnvFilter` directive (e.g. "info", "courier_driver=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log records.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts into the telemetry crate's logging settings.
    pub fn to_log_config(&self) -> courier_telemetry::LogConfig {
        courier_telemetry::LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json: self.format == LogFormat::Json,
            location: self.include_location,
            ..courier_telemetry::LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
