//! Structured logging for Courier.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_telemetry::logging::{LogConfig, init_logging};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::debug!(verb = "GET", url = "http://127.0.0.1:9292/", "Issuing request");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// How driver logs are rendered.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// When false, [`init_logging`] installs nothing.
    pub enabled: bool,

    /// `EnvFilter` directive, e.g. `info` or `courier_driver=debug,hyper=warn`.
    pub level: String,

    /// One JSON object per line instead of the multi-line pretty format.
    pub json: bool,

    /// Emit span open/close events.
    pub spans: bool,

    /// Attach source file and line to each record.
    pub location: bool,

    /// Attach the module path to each record.
    pub target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json: false,
            spans: false,
            location: false,
            target: true,
        }
    }
}

impl LogConfig {
    /// Verbose human-readable output for local debugging.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            spans: true,
            location: true,
            ..Self::default()
        }
    }

    /// JSON output for CI log collectors.
    #[must_use]
    pub fn ci() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer()
            .with_span_events(self.span_events())
            .with_file(self.location)
            .with_line_number(self.location)
            .with_target(self.target);

        if self.json {
            layer.json().boxed()
        } else {
            layer.pretty().boxed()
        }
    }
}

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` for a malformed filter and
/// `TelemetryError::LoggingInit` if a global subscriber is already set.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    tracing_subscriber::registry()
        .with(config.fmt_layer().with_filter(filter))
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses a filter directive.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidFilter` if the directive is malformed.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::InvalidFilter {
        directive: directive.to_string(),
        reason: e.to_string(),
    })
}
