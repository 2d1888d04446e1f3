//! Adapter from a tower service to [`HttpClient`].

use bytes::Bytes;
use sling_core::HttpClient;
use tower::ServiceExt;
use tower_service::Service;

use crate::{Error, Request, Response, Result};

/// Any tower service over sling requests, usable as a `Sling` transport.
///
/// Each call clones the service and drives it with `oneshot`, so the
/// service needs to be cheap to clone.
///
/// ```ignore
/// use sling::tower::ServiceBuilder;
/// use sling::{HyperClient, Request, ServiceClient, Sling, header::HeaderValue};
///
/// let stack = ServiceBuilder::new()
///     .map_request(|mut request: Request| {
///         request.headers_mut().insert("x-trace", HeaderValue::from_static("1"));
///         request
///     })
///     .service(HyperClient::new());
/// let sling = Sling::new(ServiceClient::new(stack));
/// ```
#[derive(Debug, Clone)]
pub struct ServiceClient<S> {
    service: S,
}

impl<S> ServiceClient<S> {
    /// Wrap a service.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// The wrapped service.
    #[must_use]
    pub const fn get_ref(&self) -> &S {
        &self.service
    }

    /// Unwrap the service.
    pub fn into_inner(self) -> S {
        self.service
    }
}

impl<S> HttpClient for ServiceClient<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + Sync,
    S::Future: Send,
{
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.clone().oneshot(request).await
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use tower::service_fn;

    use super::*;
    use crate::Method;

    #[tokio::test]
    async fn executes_through_the_service() {
        let echo = service_fn(|request: Request<Bytes>| async move {
            let body = request.body().cloned().unwrap_or_default();
            Ok::<_, Error>(Response::new(200, http::HeaderMap::new(), body))
        });
        let client = ServiceClient::new(echo);

        let url = url::Url::parse("http://localhost/echo").expect("url");
        let request = Request::builder(Method::Put, url)
            .body(Bytes::from_static(b"ping"))
            .build();

        let_assert!(Ok(response) = client.execute(request).await);
        check!(response.status() == 200);
        check!(response.body().as_ref() == b"ping");
    }

    #[tokio::test]
    async fn service_errors_pass_through() {
        let failing =
            service_fn(|_: Request<Bytes>| async { Err::<Response<Bytes>, _>(Error::Timeout) });
        let client = ServiceClient::new(failing);

        let url = url::Url::parse("http://localhost/").expect("url");
        let_assert!(Err(err) = client.execute(Request::builder(Method::Get, url).build()).await);
        check!(err.is_timeout());
    }
}
