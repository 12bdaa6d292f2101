//! Request construction.
//!
//! A [`Request`] is what a caller asks for: a verb, a path, params and
//! headers. [`Request::prepare`] resolves it against the driver's base URL
//! and default headers into an [`OutgoingRequest`], the exact bytes that go
//! over the wire for one hop.

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{DriverError, DriverResult};
use crate::headers::Headers;
use crate::query::encode_query;
use crate::verb::Verb;

/// Content type sent with JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A request as issued by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP verb.
    pub verb: Verb,
    /// Path relative to the base URL, or an absolute URL.
    pub path: String,
    /// Params; a JSON object (or `null` for none).
    pub params: Value,
    /// Caller headers, merged over driver defaults.
    pub headers: Headers,
}

impl Request {
    /// Creates a request with no params and no headers.
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            params: Value::Null,
            headers: Headers::new(),
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    /// Creates a `POST` request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    /// Creates a `PUT` request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Verb::Delete, path)
    }

    /// Sets params from any serializable value.
    pub fn with_params<T: Serialize + ?Sized>(mut self, params: &T) -> DriverResult<Self> {
        self.params = serde_json::to_value(params)
            .map_err(|e| DriverError::invalid_request(format!("params not serializable: {e}")))?;
        Ok(self)
    }

    /// Sets a header, replacing any value of the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merges a set of headers into the request.
    pub fn with_headers(mut self, headers: &Headers) -> Self {
        self.headers.merge(headers);
        self
    }

    /// The JSON body this request sends, if its verb carries one.
    ///
    /// `null` params are sent as an empty object.
    pub fn json_body(&self) -> DriverResult<Option<String>> {
        if !self.verb.sends_body() {
            return Ok(None);
        }
        let body = match &self.params {
            Value::Null => "{}".to_string(),
            params => serde_json::to_string(params)
                .map_err(|e| DriverError::invalid_request(format!("params not serializable: {e}")))?,
        };
        Ok(Some(body))
    }

    /// Resolves the target URL against `base`, appending query params for
    /// verbs without a body.
    pub fn resolve_url(&self, base: &Url) -> DriverResult<Url> {
        let mut url = base
            .join(&self.path)
            .map_err(|e| DriverError::invalid_request(format!("path {:?}: {e}", self.path)))?;

        if !self.verb.sends_body() {
            let encoded = encode_query(&self.params)?;
            if !encoded.is_empty() {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
                    _ => encoded,
                };
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }

    /// Builds the first hop of this request.
    ///
    /// Header precedence, lowest first: `defaults`, the JSON content type,
    /// caller headers. `Content-Length` always matches the body.
    pub fn prepare(&self, base: &Url, defaults: &Headers) -> DriverResult<OutgoingRequest> {
        let url = self.resolve_url(base)?;
        let body = self.json_body()?;

        let mut headers = defaults.clone();
        if body.is_some() {
            headers.insert(CONTENT_TYPE.as_str(), JSON_CONTENT_TYPE);
        }
        headers.merge(&self.headers);

        let body = body.map(Bytes::from);
        if let Some(body) = &body {
            headers.insert(CONTENT_LENGTH.as_str(), body.len().to_string());
        }

        Ok(OutgoingRequest {
            method: self.verb.method(),
            url,
            headers,
            body,
        })
    }
}

/// One fully resolved HTTP hop.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Final header set.
    pub headers: Headers,
    /// Body bytes, if any.
    pub body: Option<Bytes>,
}

impl OutgoingRequest {
    /// Converts into an `http` request for a transport.
    pub fn to_http(&self) -> DriverResult<http::Request<Bytes>> {
        let mut builder = http::Request::builder()
            .method(self.method.clone())
            .uri(self.url.as_str());

        if let Some(map) = builder.headers_mut() {
            *map = self.headers.to_http()?;
        }

        builder
            .body(self.body.clone().unwrap_or_default())
            .map_err(|e| DriverError::invalid_request(format!("{}: {e}", self.url)))
    }
}
