//! Hyper-backed blocking transport.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use courier_core::{DriverError, DriverResult, Transport};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::runtime::{Builder, Runtime};

/// Sends requests over HTTP/1.1 with hyper.
///
/// Owns a current-thread tokio runtime and blocks on it for every exchange,
/// so it must not be used from inside another async runtime. Connections are
/// not kept idle between requests.
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    runtime: Runtime,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport whose exchanges fail after `timeout`.
    pub fn new(timeout: Duration) -> DriverResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DriverError::connection("-", format!("failed to start runtime: {e}")))?;

        let client = Client::builder(TokioExecutor::new())
            .pool_max_idle_per_host(0)
            .build_http();

        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    /// The per-exchange timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    fn send(&mut self, request: http::Request<Bytes>) -> DriverResult<http::Response<Bytes>> {
        let url = request.uri().to_string();
        let request = request.map(Full::new);
        let client = &self.client;

        let exchange = async {
            let response = client
                .request(request)
                .await
                .map_err(|e| DriverError::connection(&url, error_chain(&e)))?;

            let (parts, body) = response.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|e| {
                    DriverError::connection(&url, format!("failed to read body: {}", error_chain(&e)))
                })?
                .to_bytes();

            Ok::<_, DriverError>(http::Response::from_parts(parts, body))
        };

        // The timer registers with the reactor, so it is created inside block_on.
        let timeout = self.timeout;
        match self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, exchange).await })
        {
            Ok(result) => result,
            Err(_) => Err(DriverError::connection(
                &url,
                format!("timed out after {}ms", self.timeout.as_millis()),
            )),
        }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Joins an error with its source chain, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
