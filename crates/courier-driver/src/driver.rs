//! The JSON driver.

use std::fmt;
use std::time::{Duration, Instant};

use courier_config::DriverConfig;
use courier_core::{DriverError, DriverResult, Headers, Request, Response, Transport, Verb};
use courier_telemetry::metrics::{record_connection_error, record_redirect, record_request};
use http::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::http_transport::HttpTransport;
use crate::redirect::RedirectPolicy;

/// Whether an HTTP error status fails the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strictness {
    Lenient,
    Strict,
}

/// Drives a web application over HTTP, one JSON request at a time.
///
/// The driver keeps the last captured [`Response`]. Every request method
/// clears it first, then replaces it once a final response arrives, so the
/// accessors always describe the most recent successful exchange.
///
/// # Example
///
/// ```rust,ignore
/// use courier_driver::JsonDriver;
/// use courier_core::Headers;
/// use serde_json::json;
///
/// let mut driver = JsonDriver::builder("http://127.0.0.1:9292").build()?;
///
/// driver.visit("/")?;
/// assert_eq!(driver.status_code()?, 200);
///
/// driver.post("/users", &json!({"name": "ada"}), &Headers::new())?;
/// assert_eq!(driver.body()?["name"], "ada");
/// ```
pub struct JsonDriver {
    config: DriverConfig,
    base_url: Url,
    default_headers: Headers,
    policy: RedirectPolicy,
    transport: Box<dyn Transport>,
    response: Option<Response>,
}

impl JsonDriver {
    /// Creates a driver that talks HTTP through [`HttpTransport`].
    pub fn new(config: DriverConfig) -> DriverResult<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Self::from_parts(config, Box::new(transport))
    }

    /// Creates a driver over any transport.
    pub fn with_transport<T>(config: DriverConfig, transport: T) -> DriverResult<Self>
    where
        T: Transport + 'static,
    {
        Self::from_parts(config, Box::new(transport))
    }

    /// Starts a builder for a driver pointed at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> JsonDriverBuilder {
        JsonDriverBuilder::new(base_url)
    }

    fn from_parts(config: DriverConfig, transport: Box<dyn Transport>) -> DriverResult<Self> {
        config
            .validate()
            .map_err(|e| DriverError::invalid_request(e.to_string()))?;
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            DriverError::invalid_request(format!("base URL {:?}: {e}", config.base_url))
        })?;

        let mut default_headers = Headers::new();
        default_headers.insert(ACCEPT.as_str(), courier_core::JSON_CONTENT_TYPE);
        for (name, value) in &config.default_headers {
            default_headers.insert(name.as_str(), value.as_str());
        }
        // Malformed defaults fail here, not on the first request.
        default_headers.to_http()?;

        Ok(Self {
            policy: RedirectPolicy::from_config(&config),
            config,
            base_url,
            default_headers,
            transport,
            response: None,
        })
    }

    /// The configuration the driver was built with.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// The parsed base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Navigates to `path` with a plain GET.
    pub fn visit(&mut self, path: &str) -> DriverResult<&Response> {
        self.issue(Verb::Get, path, &Value::Null, &Headers::new(), Strictness::Lenient)
    }

    /// Issues a GET with `params` encoded into the query string.
    pub fn get<P>(&mut self, path: &str, params: &P, headers: &Headers) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Get, path, params, headers, Strictness::Lenient)
    }

    /// Issues a POST with `params` as the JSON body.
    pub fn post<P>(&mut self, path: &str, params: &P, headers: &Headers) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Post, path, params, headers, Strictness::Lenient)
    }

    /// Issues a PUT with `params` as the JSON body.
    pub fn put<P>(&mut self, path: &str, params: &P, headers: &Headers) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Put, path, params, headers, Strictness::Lenient)
    }

    /// Issues a DELETE with `params` encoded into the query string.
    pub fn delete<P>(
        &mut self,
        path: &str,
        params: &P,
        headers: &Headers,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Delete, path, params, headers, Strictness::Lenient)
    }

    /// Like [`get`](Self::get), but fails with [`DriverError::HttpStatus`]
    /// on a 4xx or 5xx response. The response stays captured either way.
    pub fn get_strict<P>(
        &mut self,
        path: &str,
        params: &P,
        headers: &Headers,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Get, path, params, headers, Strictness::Strict)
    }

    /// Like [`post`](Self::post), failing on a 4xx or 5xx response.
    pub fn post_strict<P>(
        &mut self,
        path: &str,
        params: &P,
        headers: &Headers,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Post, path, params, headers, Strictness::Strict)
    }

    /// Like [`put`](Self::put), failing on a 4xx or 5xx response.
    pub fn put_strict<P>(
        &mut self,
        path: &str,
        params: &P,
        headers: &Headers,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Put, path, params, headers, Strictness::Strict)
    }

    /// Like [`delete`](Self::delete), failing on a 4xx or 5xx response.
    pub fn delete_strict<P>(
        &mut self,
        path: &str,
        params: &P,
        headers: &Headers,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.issue(Verb::Delete, path, params, headers, Strictness::Strict)
    }

    /// Sends a prebuilt request and captures its final response.
    pub fn request(&mut self, request: &Request) -> DriverResult<&Response> {
        self.perform(request)
    }

    fn issue<P>(
        &mut self,
        verb: Verb,
        path: &str,
        params: &P,
        headers: &Headers,
        strictness: Strictness,
    ) -> DriverResult<&Response>
    where
        P: Serialize + ?Sized,
    {
        self.response = None;
        let request = Request::new(verb, path)
            .with_params(params)?
            .with_headers(headers);

        let response = self.perform(&request)?;
        if strictness == Strictness::Strict {
            response.error_for_status()?;
        }
        Ok(response)
    }

    /// Runs one request through the redirect loop.
    fn perform(&mut self, request: &Request) -> DriverResult<&Response> {
        self.response = None;
        let started = Instant::now();
        let verb = request.verb.as_str();

        let mut outgoing = request.prepare(&self.base_url, &self.default_headers)?;
        debug!(verb, url = %outgoing.url, "Issuing request");

        // Same-origin hops are judged against where the request went, which
        // differs from the base URL when the path was absolute.
        let origin = outgoing.url.clone();
        let mut redirects = 0;
        loop {
            let reply = match self.transport.send(outgoing.to_http()?) {
                Ok(reply) => reply,
                Err(err) => {
                    if err.is_connection() {
                        record_connection_error(verb);
                    }
                    return Err(err);
                }
            };

            let status = reply.status().as_u16();
            let Some(next) = self.policy.next_hop(&origin, &outgoing, &reply) else {
                let elapsed = started.elapsed();
                debug!(
                    verb,
                    url = %outgoing.url,
                    status,
                    redirects,
                    duration_ms = duration_ms(elapsed),
                    "Captured response"
                );
                record_request(verb, status, elapsed);

                let response = Response::from_http(reply, outgoing.url).with_redirects(redirects);
                return Ok(&*self.response.insert(response));
            };

            if redirects >= self.policy.max_redirects() {
                return Err(DriverError::TooManyRedirects {
                    limit: self.policy.max_redirects(),
                    url: next.url.to_string(),
                });
            }
            redirects += 1;
            debug!(status, hop = redirects, url = %next.url, "Following redirect");
            record_redirect(status);
            outgoing = next;
        }
    }

    /// The captured response.
    pub fn response(&self) -> DriverResult<&Response> {
        self.response.as_ref().ok_or(DriverError::NoResponse)
    }

    /// URL of the captured response, after any followed redirects.
    pub fn current_url(&self) -> DriverResult<String> {
        Ok(self.response()?.final_url().to_string())
    }

    /// Status code of the captured response.
    pub fn status_code(&self) -> DriverResult<u16> {
        Ok(self.response()?.status_code())
    }

    /// Headers of the captured response.
    pub fn response_headers(&self) -> DriverResult<&Headers> {
        Ok(self.response()?.headers())
    }

    /// The captured body, unmodified.
    pub fn source(&self) -> DriverResult<&str> {
        Ok(self.response()?.source())
    }

    /// The captured body decoded as JSON.
    pub fn body(&self) -> DriverResult<&Value> {
        self.response()?.json()
    }

    /// Same as [`body`](Self::body).
    pub fn json(&self) -> DriverResult<&Value> {
        self.body()
    }

    /// Forgets the captured response.
    pub fn reset(&mut self) {
        self.response = None;
    }
}

impl fmt::Debug for JsonDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDriver")
            .field("base_url", &self.base_url.as_str())
            .field("policy", &self.policy)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

/// Builder for [`JsonDriver`].
#[must_use]
pub struct JsonDriverBuilder {
    config: DriverConfig,
    transport: Option<Box<dyn Transport>>,
}

impl JsonDriverBuilder {
    /// Starts from the default configuration pointed at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(DriverConfig::new(base_url))
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: DriverConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Whether to follow redirects.
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Maximum redirect hops per request.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Per-hop request timeout.
    #[allow(clippy::cast_possible_truncation)]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Adds a header sent with every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .default_headers
            .insert(name.into(), value.into());
        self
    }

    /// Allows redirects to this host even though it is not the base origin.
    pub fn allow_redirect_host(mut self, host: impl Into<String>) -> Self {
        self.config.allowed_redirect_hosts.push(host.into());
        self
    }

    /// Uses `transport` instead of [`HttpTransport`].
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Builds the driver.
    pub fn build(self) -> DriverResult<JsonDriver> {
        match self.transport {
            Some(transport) => JsonDriver::from_parts(self.config, transport),
            None => JsonDriver::new(self.config),
        }
    }
}

impl fmt::Debug for JsonDriverBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonDriverBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}
