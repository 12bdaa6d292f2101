//! # Courier Core
//!
//! Core types for the Courier JSON HTTP test driver.
//!
//! - [`DriverError`] - The error taxonomy surfaced to callers
//! - [`Headers`] - Ordered header map with case-insensitive lookup
//! - [`Verb`] and [`Request`] - What a caller asks the driver to send
//! - [`Response`] - The captured response with memoised JSON decoding
//! - [`Transport`] - The seam between the driver and an HTTP client

#![doc(html_root_url = "https://docs.rs/courier-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod headers;
pub mod query;
mod request;
mod response;
mod transport;
mod verb;

pub use error::{DriverError, DriverResult};
pub use headers::Headers;
pub use request::{OutgoingRequest, Request, JSON_CONTENT_TYPE};
pub use response::Response;
pub use transport::Transport;
pub use verb::Verb;
