//! Loopback HTTP server for end-to-end tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_test::TestServer;
//!
//! let server = TestServer::start()?;
//! let mut driver = JsonDriver::builder(server.base_url()).build()?;
//! driver.visit("/")?;
//! // The server stops when `server` is dropped.
//! ```

use std::convert::Infallible;
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;
use std::thread::JoinHandle;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::app::target_app;
use crate::error::TestError;
use crate::transport::Handler;

/// Serves a handler on `127.0.0.1` from a background thread.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Serves [`target_app`] on an ephemeral port.
    pub fn start() -> Result<Self, TestError> {
        Self::serve(target_app)
    }

    /// Serves `handler` on an ephemeral port.
    pub fn serve<F>(handler: F) -> Result<Self, TestError>
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        let listener = StdTcpListener::bind("127.0.0.1:0").map_err(TestError::Bind)?;
        listener.set_nonblocking(true).map_err(TestError::Bind)?;
        let addr = listener.local_addr().map_err(TestError::Bind)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(TestError::Runtime)?;

        let handler: Handler = Arc::new(handler);
        let (shutdown, signal) = oneshot::channel();

        let thread = std::thread::Builder::new()
            .name(format!("courier-test-server-{}", addr.port()))
            .spawn(move || runtime.block_on(accept_loop(listener, handler, signal)))
            .map_err(TestError::Spawn)?;

        tracing::debug!(%addr, "Test server listening");

        Ok(Self {
            addr,
            shutdown: Some(shutdown),
            thread: Some(thread),
        })
    }

    /// The bound socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:{port}`, suitable as a driver base URL.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!(addr = %self.addr, "Test server thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for TestServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestServer")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

async fn accept_loop(
    listener: StdTcpListener,
    handler: Handler,
    mut shutdown: oneshot::Receiver<()>,
) {
    let listener = match TcpListener::from_std(listener) {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to register test listener: {}", e);
            return;
        }
    };

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, remote_addr)) => {
                        let handler = Arc::clone(&handler);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, handler).await {
                                tracing::debug!("Connection error from {}: {}", remote_addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!("Failed to accept connection: {}", e);
                    }
                }
            }

            _ = &mut shutdown => {
                tracing::debug!("Test server stopping");
                break;
            }
        }
    }
}

async fn handle_connection(
    stream: tokio::net::TcpStream,
    handler: Handler,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |request: http::Request<Incoming>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, Infallible>(handle_request(request, &handler).await) }
    });

    http1::Builder::new().serve_connection(io, service).await
}

async fn handle_request(
    request: http::Request<Incoming>,
    handler: &Handler,
) -> http::Response<Full<Bytes>> {
    let (parts, body) = request.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!("Failed to collect request body: {}", e);
            let mut response = http::Response::new(Full::new(Bytes::from_static(
                b"failed to read request body",
            )));
            *response.status_mut() = StatusCode::BAD_REQUEST;
            return response;
        }
    };

    handler(http::Request::from_parts(parts, body)).map(Full::new)
}
