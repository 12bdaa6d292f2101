//! Driver metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_telemetry::metrics::record_request;
//!
//! record_request("GET", 200, Duration::from_millis(12));
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Registers descriptions for all driver metrics.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        "courier_requests_total",
        "Responses captured by the driver, by verb and status class"
    );
    describe_histogram!(
        "courier_request_duration_seconds",
        "Time from issuing a request to capturing its final response"
    );
    describe_counter!("courier_redirects_total", "Redirect hops followed");
    describe_counter!(
        "courier_connection_errors_total",
        "Requests that failed at the transport level"
    );
}

/// Maps a status code to its class label (`2xx`, `4xx`, ...).
#[must_use]
pub fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Records a captured final response.
pub fn record_request(verb: &str, status_code: u16, duration: Duration) {
    counter!(
        "courier_requests_total",
        "verb" => verb.to_string(),
        "status_class" => status_class(status_code)
    )
    .increment(1);

    histogram!(
        "courier_request_duration_seconds",
        "verb" => verb.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records one followed redirect hop.
pub fn record_redirect(status_code: u16) {
    counter!("courier_redirects_total", "status" => status_code.to_string()).increment(1);
}

/// Records a transport-level failure.
pub fn record_connection_error(verb: &str) {
    counter!("courier_connection_errors_total", "verb" => verb.to_string()).increment(1);
}
