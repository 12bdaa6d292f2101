//! Telemetry errors.

use thiserror::Error;

/// Failure to set up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("logging already initialised: {0}")]
    LoggingInit(String),

    /// The filter directive did not parse.
    #[error("invalid log filter {directive:?}: {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
}
