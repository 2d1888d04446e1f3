//! Request body providers.
//!
//! A [`BodyProvider`] yields a content type and the encoded body bytes.
//! The bytes are produced lazily, when the request is built.

use bytes::Bytes;

use crate::{ContentType, Result};

/// Strategy producing a request body.
pub trait BodyProvider: Send + Sync {
    /// MIME type of the body. An empty string means "do not set `Content-Type`".
    fn content_type(&self) -> &str;

    /// Encode the body.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn body(&self) -> Result<Bytes>;
}

impl std::fmt::Debug for dyn BodyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyProvider")
            .field("content_type", &self.content_type())
            .finish_non_exhaustive()
    }
}

/// JSON body (`application/json`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonBody<T> {
    data: T,
}

impl<T> JsonBody<T> {
    /// Wrap a serializable value.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { data }
    }

    /// The wrapped value.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }
}

impl<T> BodyProvider for JsonBody<T>
where
    T: serde::Serialize + Send + Sync,
{
    fn content_type(&self) -> &str {
        ContentType::Json.as_str()
    }

    fn body(&self) -> Result<Bytes> {
        crate::to_json(&self.data)
    }
}

/// Form URL-encoded body (`application/x-www-form-urlencoded`).
///
/// Fields follow the same conventions as query sources; pairs are emitted
/// sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBody<T> {
    data: T,
}

impl<T> FormBody<T> {
    /// Wrap a serializable value.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { data }
    }

    /// The wrapped value.
    #[must_use]
    pub const fn data(&self) -> &T {
        &self.data
    }
}

impl<T> BodyProvider for FormBody<T>
where
    T: serde::Serialize + Send + Sync,
{
    fn content_type(&self) -> &str {
        ContentType::FormUrlEncoded.as_str()
    }

    fn body(&self) -> Result<Bytes> {
        crate::to_form(&self.data)
    }
}

/// Pre-encoded body with a caller-chosen content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody {
    content_type: String,
    data: Bytes,
}

impl RawBody {
    /// Body with an explicit content type (may be empty).
    #[must_use]
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// `text/plain` body.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ContentType::PlainText.as_str(), Bytes::from(text.into()))
    }

    /// `application/octet-stream` body.
    #[must_use]
    pub fn octet_stream(data: impl Into<Bytes>) -> Self {
        Self::new(ContentType::OctetStream.as_str(), data)
    }
}

impl BodyProvider for RawBody {
    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn body(&self) -> Result<Bytes> {
        Ok(self.data.clone())
    }
}
