//! Default [`HttpClient`] for `Sling`: a pooled hyper-util client over rustls.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use sling_core::HttpClient;
use tower_service::Service;
use tracing::{debug, trace, warn};

use crate::{ClientConfig, Error, Request, Response, Result};

type Pool = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Hyper-util transport with connection pooling and rustls TLS.
///
/// Every exchange is bounded by [`ClientConfig::timeout`] and reported
/// through `tracing`: the outcome at debug, headers at trace, failures at
/// warn. Clones share the connection pool.
///
/// ```ignore
/// use std::time::Duration;
/// use sling::{ClientConfig, HyperClient, Sling};
///
/// let client = HyperClient::with_config(
///     ClientConfig::default().with_timeout(Duration::from_secs(10)),
/// );
/// let github = Sling::new(client).base("https://api.github.com/");
/// ```
#[derive(Clone)]
pub struct HyperClient {
    pool: Pool,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Client with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Client with a custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let pool = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector(&config));
        Self { pool, config }
    }

    /// Configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn exchange(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let request = into_hyper(request)?;

        let response = tokio::time::timeout(self.config.timeout, self.pool.request(request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(classify)?;

        let (parts, body) = response.into_parts();
        let body = tokio::time::timeout(self.config.timeout, body.collect())
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|e| Error::connection(describe(&e)))?
            .to_bytes();

        Ok(Response::new(parts.status.as_u16(), parts.headers, body))
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        trace!(headers = ?request.headers(), "sending");
        let start = Instant::now();
        let result = self.exchange(request).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) => debug!(
                status = response.status(),
                body_len = response.body().len(),
                elapsed_ms,
                "exchange complete"
            ),
            Err(err) => warn!(error = %err, elapsed_ms, "exchange failed"),
        }
        result
    }
}

/// Lets a `HyperClient` sit at the bottom of a tower stack, see
/// [`ServiceClient`](crate::ServiceClient).
impl Service<Request<Bytes>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

/// Plain `http://` is allowed; TLS uses the Mozilla roots.
fn connector(config: &ClientConfig) -> HttpsConnector<HttpConnector> {
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(config.connect_timeout));

    let roots: rustls::RootCertStore = webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();
    let tls = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

fn into_hyper(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
    let (method, url, headers, body) = request.into_parts();

    let mut out = http::Request::builder()
        .method(http::Method::from(method))
        .uri(url.as_str())
        .body(body.map_or_else(Full::default, Full::new))
        .map_err(|e| Error::invalid_request(e.to_string()))?;
    *out.headers_mut() = headers;
    Ok(out)
}

#[allow(clippy::needless_pass_by_value)]
fn classify(err: hyper_util::client::legacy::Error) -> Error {
    let message = describe(&err);
    if is_tls(&err) {
        Error::tls(message)
    } else {
        Error::connection(message)
    }
}

/// Error message followed by each source, joined with `: `.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A rustls error somewhere in the chain, directly or wrapped in `io::Error`.
fn is_tls(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(cause) = current {
        if cause.is::<rustls::Error>() {
            return true;
        }
        if let Some(io) = cause.downcast_ref::<std::io::Error>()
            && io.get_ref().is_some_and(|inner| inner.is::<rustls::Error>())
        {
            return true;
        }
        current = cause.source();
    }
    false
}
