//! The [`Sling`] request builder.
//!
//! A `Sling` accumulates method, URL, headers, query sources, a body provider
//! and a response decoder through chained calls, then builds, executes, and
//! optionally decodes the request.
//!
//! Configuration never fails: an invalid URL or header is ignored, the
//! previous state is kept, and the error is available from
//! [`Sling::last_error`]. Problems that leave the request incomplete surface
//! when the request is built.

use std::sync::Arc;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{Instrument, Level, debug, span, trace, warn};
use url::Url;

use crate::{
    BodyProvider, Destination, Error, FormBody, HttpClient, HyperClient, JsonBody, Method,
    QuerySource, Request, Response, ResponseDecoder, Result, StatusCode, merge_queries,
};

/// Fluent HTTP request builder and response receiver.
///
/// # Example
///
/// ```ignore
/// use sling::{JsonDecoder, Sling};
///
/// #[derive(serde::Deserialize)]
/// struct User {
///     login: String,
/// }
///
/// #[derive(serde::Serialize)]
/// struct Page {
///     page: u32,
/// }
///
/// let parent = Sling::default()
///     .base("https://api.github.com/")
///     .add_header("Accept", "application/vnd.github.v3+json")
///     .response_decoder(JsonDecoder);
///
/// let mut user = User { login: String::new() };
/// parent
///     .try_clone()?
///     .get("users/octocat")
///     .add_query(Page { page: 1 })
///     .receive(&mut user)
///     .await?;
/// ```
pub struct Sling<C = HyperClient> {
    client: Arc<C>,
    method: Method,
    url: Option<Url>,
    headers: HeaderMap,
    queries: Vec<Arc<dyn QuerySource>>,
    body_provider: Option<Arc<dyn BodyProvider>>,
    response_decoder: Option<Arc<dyn ResponseDecoder>>,
    last_error: Option<Arc<Error>>,
}

impl<C> std::fmt::Debug for Sling<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sling")
            .field("method", &self.method)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("headers", &self.headers)
            .field("queries", &self.queries.len())
            .field("body_provider", &self.body_provider)
            .field("response_decoder", &self.response_decoder.is_some())
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Copies everything; the HTTP client is shared, not duplicated.
impl<C> Clone for Sling<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            method: self.method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            queries: self.queries.clone(),
            body_provider: self.body_provider.clone(),
            response_decoder: self.response_decoder.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

impl<C: Default> Default for Sling<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<C> Sling<C> {
    /// Create an empty builder executing requests with `client`.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_shared_client(Arc::new(client))
    }

    /// Create an empty builder sharing an existing client.
    #[must_use]
    pub fn with_shared_client(client: Arc<C>) -> Self {
        Self {
            client,
            method: Method::default(),
            url: None,
            headers: HeaderMap::new(),
            queries: Vec::new(),
            body_provider: None,
            response_decoder: None,
            last_error: None,
        }
    }

    /// Copy this builder for an independent request.
    ///
    /// The client is shared; URL, headers, and queries are copied, so changes
    /// to the copy never reach `self`. The URL is re-validated on the way.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL no longer parses.
    pub fn try_clone(&self) -> Result<Self> {
        let mut cloned = self.clone();
        if let Some(url) = &self.url {
            cloned.url = Some(Url::parse(url.as_str())?);
        }
        Ok(cloned)
    }

    // ========================================================================
    // HTTP client
    // ========================================================================

    /// Replace the HTTP client; `None` falls back to a fresh `C::default()`.
    #[must_use]
    pub fn http_client(mut self, client: Option<C>) -> Self
    where
        C: Default,
    {
        self.client = Arc::new(client.unwrap_or_default());
        self
    }

    /// The HTTP client executing requests.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    // ========================================================================
    // Method and URL
    // ========================================================================

    /// Set the base URL, replacing any current URL.
    #[must_use]
    pub fn base(mut self, base_url: &str) -> Self {
        match Url::parse(base_url) {
            Ok(url) => {
                self.url = Some(url);
                self
            }
            Err(err) => self.ignore(err.into()),
        }
    }

    /// Resolve `path` against the current URL.
    ///
    /// ```text
    /// base: https://example.com/api/   path: users     -> https://example.com/api/users
    /// base: https://example.com/api    path: users     -> https://example.com/users
    /// base: https://example.com/api/   path: /users    -> https://example.com/users
    /// any base                         path: https://other.org/x -> https://other.org/x
    /// ```
    ///
    /// Without a current URL, `path` must be absolute.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        let resolved = match &self.url {
            Some(base) => base.join(path),
            None => Url::parse(path),
        };
        match resolved {
            Ok(url) => {
                self.url = Some(url);
                self
            }
            Err(err) => self.ignore(err.into()),
        }
    }

    /// Set the method and resolve `path` against the current URL.
    #[must_use]
    pub fn method(mut self, method: Method, path: &str) -> Self {
        self.method = method;
        self.path(path)
    }

    /// `GET path`.
    #[must_use]
    pub fn get(self, path: &str) -> Self {
        self.method(Method::Get, path)
    }

    /// `HEAD path`.
    #[must_use]
    pub fn head(self, path: &str) -> Self {
        self.method(Method::Head, path)
    }

    /// `POST path`.
    #[must_use]
    pub fn post(self, path: &str) -> Self {
        self.method(Method::Post, path)
    }

    /// `PUT path`.
    #[must_use]
    pub fn put(self, path: &str) -> Self {
        self.method(Method::Put, path)
    }

    /// `PATCH path`.
    #[must_use]
    pub fn patch(self, path: &str) -> Self {
        self.method(Method::Patch, path)
    }

    /// `DELETE path`.
    #[must_use]
    pub fn delete(self, path: &str) -> Self {
        self.method(Method::Delete, path)
    }

    /// `CONNECT path`.
    #[must_use]
    pub fn connect(self, path: &str) -> Self {
        self.method(Method::Connect, path)
    }

    /// `OPTIONS path`.
    #[must_use]
    pub fn options(self, path: &str) -> Self {
        self.method(Method::Options, path)
    }

    /// `TRACE path`.
    #[must_use]
    pub fn trace(self, path: &str) -> Self {
        self.method(Method::Trace, path)
    }

    // ========================================================================
    // Headers
    // ========================================================================

    /// Append a header value, keeping existing values for the same name.
    #[must_use]
    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.append(name, value);
                self
            }
            Err(err) => self.ignore(err),
        }
    }

    /// Set a header value, replacing existing values for the same name.
    #[must_use]
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Ok((name, value)) => {
                self.headers.insert(name, value);
                self
            }
            Err(err) => self.ignore(err),
        }
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Append a query source, serialized when the request is built.
    #[must_use]
    pub fn add_query<Q>(mut self, query: Q) -> Self
    where
        Q: QuerySource + 'static,
    {
        self.queries.push(Arc::new(query));
        self
    }

    /// Append several query sources, in order.
    #[must_use]
    pub fn add_queries<I, Q>(mut self, queries: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: QuerySource + 'static,
    {
        self.queries
            .extend(queries.into_iter().map(|q| Arc::new(q) as Arc<dyn QuerySource>));
        self
    }

    // ========================================================================
    // Body
    // ========================================================================

    /// Send `data` as a JSON body.
    #[must_use]
    pub fn body_json<T>(self, data: T) -> Self
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        self.body_provider(JsonBody::new(data))
    }

    /// Send `data` as a form URL-encoded body.
    #[must_use]
    pub fn body_form<T>(self, data: T) -> Self
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        self.body_provider(FormBody::new(data))
    }

    /// Send the body produced by `provider`.
    ///
    /// Sets `Content-Type` from the provider unless it reports an empty one.
    #[must_use]
    pub fn body_provider<P>(mut self, provider: P) -> Self
    where
        P: BodyProvider + 'static,
    {
        let content_type = provider.content_type();
        if !content_type.is_empty() {
            self = self.set_header(CONTENT_TYPE.as_str(), content_type);
        }
        self.body_provider = Some(Arc::new(provider));
        self
    }

    // ========================================================================
    // Response
    // ========================================================================

    /// Decoder used by [`Sling::receive`].
    #[must_use]
    pub fn response_decoder<D>(mut self, decoder: D) -> Self
    where
        D: ResponseDecoder + 'static,
    {
        self.response_decoder = Some(Arc::new(decoder));
        self
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Configured method (GET unless set).
    #[must_use]
    pub const fn http_method(&self) -> Method {
        self.method
    }

    /// Current URL, before queries are merged.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Configured headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Number of pending query sources.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.len()
    }

    /// Most recent configuration error that was ignored, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_deref()
    }

    fn ignore(mut self, error: Error) -> Self {
        debug!(error = %error, "ignoring invalid configuration");
        self.last_error = Some(Arc::new(error));
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the transport request.
    ///
    /// Query sources are merged into a copy of the URL, so building twice
    /// yields the same request.
    ///
    /// # Errors
    ///
    /// Returns an error if no URL is configured, a query source cannot be
    /// serialized, or the body provider fails.
    pub fn request(&self) -> Result<Request<Bytes>> {
        let Some(url) = &self.url else {
            let message = match &self.last_error {
                Some(err) => format!("no URL configured (last configuration error: {err})"),
                None => "no URL configured".to_string(),
            };
            return Err(Error::invalid_request(message));
        };

        let mut url = url.clone();
        merge_queries(&mut url, &self.queries)?;

        let body = self
            .body_provider
            .as_deref()
            .map(BodyProvider::body)
            .transpose()?;

        let builder = Request::builder(self.method, url).headers(self.headers.clone());
        Ok(match body {
            Some(body) => builder.body(body),
            None => builder,
        }
        .build())
    }
}

impl<C: HttpClient> Sling<C> {
    /// Build and execute the request.
    ///
    /// The status code is not interpreted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn response(&self) -> Result<Response<Bytes>> {
        let request = self.request()?;
        let span = span!(
            Level::DEBUG,
            "http_request",
            method = %request.method(),
            url = %request.url()
        );

        async move {
            debug!("sending request");
            let response = self.client.execute(request).await?;
            debug!(status = response.status(), "response received");
            Ok(response)
        }
        .instrument(span)
        .await
    }

    /// Execute the request and decode a `200 OK` body into `destination`.
    ///
    /// - without a response decoder, the request is sent and `destination` is left untouched
    /// - any status other than `200` is an [`Error::Http`] and nothing is decoded
    /// - a declared `Content-Length: 0` leaves `destination` untouched
    ///
    /// Bytes the decoder did not read are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not `200`, or decoding fails.
    pub async fn receive<T>(&self, destination: &mut T) -> Result<()>
    where
        T: Destination + Send,
    {
        let mut response = self.response().await?;

        let Some(decoder) = self.response_decoder.as_deref() else {
            debug!("no response decoder configured, skipping decode");
            return Ok(());
        };

        let status = response.status();
        if status != StatusCode::OK.as_u16() {
            warn!(status, "unexpected response status");
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .unwrap_or("unexpected status");
            return Err(Error::http_with_body(status, reason, response.into_body()));
        }

        if response.content_length() == Some(0) {
            debug!("empty response body, skipping decode");
            return Ok(());
        }

        decoder.decode(&mut response, destination)?;

        let unread = response.body().len();
        if unread > 0 {
            trace!(unread, "discarding unread response body");
            response.body_mut().clear();
        }
        Ok(())
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|err| Error::invalid_header(format!("{name:?}: {err}")))?;
    let header_value = HeaderValue::from_str(value)
        .map_err(|err| Error::invalid_header(format!("{name}: {err}")))?;
    Ok((header_name, header_value))
}
