//! The captured response.

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{DriverError, DriverResult};
use crate::headers::Headers;

/// A response captured by the driver.
///
/// The JSON form of the body is decoded at most once, on first access, and
/// the outcome (value or error) is memoised.
pub struct Response {
    status_code: u16,
    headers: Headers,
    raw_body: String,
    final_url: Url,
    redirects: usize,
    parsed_json: OnceCell<Result<Value, Arc<serde_json::Error>>>,
}

impl Response {
    /// Creates a response from raw parts.
    ///
    /// Bodies that are not UTF-8 are decoded lossily.
    pub fn new(status_code: u16, headers: Headers, body: &Bytes, final_url: Url) -> Self {
        Self {
            status_code,
            headers,
            raw_body: String::from_utf8_lossy(body).into_owned(),
            final_url,
            redirects: 0,
            parsed_json: OnceCell::new(),
        }
    }

    /// Captures an `http` response received from `final_url`.
    pub fn from_http(response: http::Response<Bytes>, final_url: Url) -> Self {
        let (parts, body) = response.into_parts();
        Self::new(
            parts.status.as_u16(),
            Headers::from_http(&parts.headers),
            &body,
            final_url,
        )
    }

    /// Records how many redirects were followed to reach this response.
    #[must_use]
    pub fn with_redirects(mut self, redirects: usize) -> Self {
        self.redirects = redirects;
        self
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body exactly as received.
    pub fn source(&self) -> &str {
        &self.raw_body
    }

    /// URL of the last hop.
    pub fn final_url(&self) -> &Url {
        &self.final_url
    }

    /// Number of redirects followed.
    pub fn redirects(&self) -> usize {
        self.redirects
    }

    /// Returns true for 4xx and 5xx statuses.
    pub fn is_error(&self) -> bool {
        (400..=599).contains(&self.status_code)
    }

    /// Returns true for 3xx statuses.
    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.status_code)
    }

    /// The decoded JSON body.
    pub fn json(&self) -> DriverResult<&Value> {
        self.parsed_json
            .get_or_init(|| serde_json::from_str(&self.raw_body).map_err(Arc::new))
            .as_ref()
            .map_err(|e| DriverError::Parse(Arc::clone(e)))
    }

    /// Deserializes the JSON body into a typed value.
    pub fn json_as<T: DeserializeOwned>(&self) -> DriverResult<T> {
        T::deserialize(self.json()?).map_err(DriverError::parse)
    }

    /// The body as carried by [`DriverError::HttpStatus`]: decoded JSON when
    /// possible, otherwise the raw body as a JSON string.
    pub fn parsed_body(&self) -> Value {
        self.json()
            .cloned()
            .unwrap_or_else(|_| Value::String(self.raw_body.clone()))
    }

    /// Fails with [`DriverError::HttpStatus`] for 4xx/5xx statuses.
    pub fn error_for_status(&self) -> DriverResult<()> {
        if self.is_error() {
            return Err(DriverError::http_status(
                self.status_code,
                self.parsed_body(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status_code", &self.status_code)
            .field("final_url", &self.final_url.as_str())
            .field("headers", &self.headers)
            .field("body_len", &self.raw_body.len())
            .field("redirects", &self.redirects)
            .finish()
    }
}
