//! HTTP client trait.
//!
//! [`HttpClient`] is the only boundary between sling and the network. Any
//! implementation can be injected: the hyper-based client shipped with
//! `sling`, a wrapper adding authentication, or an in-memory test double.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations are shared between cloned request builders, so they must
/// be safe for concurrent use.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use http::HeaderMap;
/// use sling_core::{HttpClient, Request, Response, Result};
///
/// /// Answers every request with `204 No Content`.
/// struct NoContent;
///
/// impl HttpClient for NoContent {
///     async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
///         Ok(Response::new(204, HeaderMap::new(), Bytes::new()))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Status codes are not interpreted: a `500` is a successful execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
