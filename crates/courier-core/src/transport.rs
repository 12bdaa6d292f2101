//! The HTTP transport seam.

use bytes::Bytes;

use crate::error::DriverResult;

/// A blocking, single round-trip HTTP client.
///
/// Implementations receive requests with an absolute URI, perform exactly one
/// exchange (redirects are never followed here), and return the complete
/// response. Connection-level failures map to
/// [`DriverError::Connection`](crate::DriverError::Connection); HTTP error
/// statuses are ordinary responses.
pub trait Transport: Send {
    /// Sends one request and waits for the full response.
    fn send(&mut self, request: http::Request<Bytes>) -> DriverResult<http::Response<Bytes>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: http::Request<Bytes>) -> DriverResult<http::Response<Bytes>> {
        (**self).send(request)
    }
}
