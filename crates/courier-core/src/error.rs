//! Error types for Courier.
//!
//! [`DriverError`] is the single error type surfaced by the driver. Only the
//! strict verb variants produce [`DriverError::HttpStatus`]; every other
//! operation treats 4xx/5xx responses as data and fails only on connectivity,
//! parsing, or request-construction problems.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Result type alias using [`DriverError`].
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by the driver and its transports.
#[derive(Error, Debug, Clone)]
pub enum DriverError {
    /// Transport-level failure: unreachable host, refused connection,
    /// timeout, or a body that could not be read.
    #[error("connection to {url} failed: {message}")]
    Connection {
        /// The URL that was being requested.
        url: String,
        /// Human-readable cause.
        message: String,
    },

    /// The response body was requested as JSON but is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Parse(#[source] Arc<serde_json::Error>),

    /// A strict request received a 4xx or 5xx status.
    #[error("request failed with HTTP status {status_code}")]
    HttpStatus {
        /// The HTTP status code of the captured response.
        status_code: u16,
        /// The decoded body, or the raw body as a JSON string when it is not JSON.
        parsed_body: Value,
    },

    /// An accessor was called before any response was captured.
    #[error("no response has been captured; issue a request first")]
    NoResponse,

    /// The redirect chain was longer than the configured limit.
    #[error("exceeded the limit of {limit} redirects while requesting {url}")]
    TooManyRedirects {
        /// The configured hop limit.
        limit: usize,
        /// The location the next hop would have requested.
        url: String,
    },

    /// The request could not be built (bad URL, header, or params).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Human-readable cause.
        message: String,
    },
}

impl DriverError {
    /// Create a connection error.
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a parse error from a JSON decoding failure.
    pub fn parse(source: serde_json::Error) -> Self {
        Self::Parse(Arc::new(source))
    }

    /// Create an HTTP status error.
    pub fn http_status(status_code: u16, parsed_body: Value) -> Self {
        Self::HttpStatus {
            status_code,
            parsed_body,
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Returns true for transport-level failures.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns true for errors raised by strict verb variants.
    #[must_use]
    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }

    /// Returns the HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Returns the decoded body carried by an HTTP status error.
    #[must_use]
    pub fn parsed_body(&self) -> Option<&Value> {
        match self {
            Self::HttpStatus { parsed_body, .. } => Some(parsed_body),
            _ => None,
        }
    }
}
