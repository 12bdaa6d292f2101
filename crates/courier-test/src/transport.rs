//! In-memory transport.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use courier_core::{DriverResult, Transport};

use crate::app::target_app;

/// Request handler invoked in place of a network round trip.
pub type Handler = Arc<dyn Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync>;

/// Hands every request straight to an in-process handler.
///
/// Requests keep the absolute URI the driver built; no `Host` header is
/// added.
#[derive(Clone)]
pub struct HandlerTransport {
    handler: Handler,
}

impl HandlerTransport {
    /// Wraps a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(http::Request<Bytes>) -> http::Response<Bytes> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Serves [`target_app`].
    pub fn target_app() -> Self {
        Self::new(target_app)
    }
}

impl Transport for HandlerTransport {
    fn send(&mut self, request: http::Request<Bytes>) -> DriverResult<http::Response<Bytes>> {
        Ok((self.handler)(request))
    }
}

impl fmt::Debug for HandlerTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTransport").finish_non_exhaustive()
    }
}
