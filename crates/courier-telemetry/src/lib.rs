//! Observability for Courier.
//!
//! - **Logging**: `tracing-subscriber` setup with JSON or pretty output
//! - **Metrics**: request counters and latency histograms through the
//!   `metrics` facade; they are no-ops until the host installs a recorder
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `courier_requests_total` | Counter | `verb`, `status_class` | Captured responses |
//! | `courier_request_duration_seconds` | Histogram | `verb` | Time to final response |
//! | `courier_redirects_total` | Counter | `status` | Redirect hops followed |
//! | `courier_connection_errors_total` | Counter | `verb` | Transport failures |

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
