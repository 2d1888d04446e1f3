//! Response decoders.
//!
//! A [`ResponseDecoder`] consumes the body of a [`Response`] into a
//! caller-supplied [`Destination`]. Two decoders ship with sling:
//! - [`JsonDecoder`] deserializes one JSON value into any `DeserializeOwned` destination
//! - [`RawDecoder`] copies the body verbatim into a `Vec<u8>` or `String`
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use http::HeaderMap;
//! use sling_core::{JsonDecoder, Response, ResponseDecoder};
//!
//! #[derive(serde::Deserialize)]
//! struct User { login: String }
//!
//! let mut response = Response::new(200, HeaderMap::new(), Bytes::from(r#"{"login":"x"}"#));
//! let mut user = User { login: String::new() };
//! JsonDecoder.decode(&mut response, &mut user).expect("decode");
//! assert_eq!(user.login, "x");
//! ```

use std::any::Any;
use std::io::Read;

use bytes::{Buf, Bytes};

use crate::{Error, Response, Result};

/// A value a [`ResponseDecoder`] can write into.
///
/// Implemented for every `DeserializeOwned + 'static` type. Decoders either
/// deserialize in place ([`Destination::deserialize_json`]) or look for an
/// exact type they support through [`Destination::as_any_mut`].
pub trait Destination: Any {
    /// Replace `self` with the JSON value read from `reader`.
    ///
    /// Bytes after the value are left in the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid JSON for this type.
    fn deserialize_json(&mut self, reader: &mut dyn Read) -> Result<()>;

    /// Exact-type access for decoders with restricted destinations.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Rust type name of the destination, for error messages.
    fn type_name(&self) -> &'static str;
}

impl<T> Destination for T
where
    T: serde::de::DeserializeOwned + Any,
{
    fn deserialize_json(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut deserializer = serde_json::Deserializer::from_reader(reader);
        *self = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
            Error::json_deserialization(e.path().to_string(), e.inner().to_string())
        })?;
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Strategy decoding a response body into a destination.
pub trait ResponseDecoder: Send + Sync {
    /// Populate `destination` from `response`.
    ///
    /// Decoders may consume the body; unread bytes are discarded by the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is malformed or the destination type is unsupported.
    fn decode(&self, response: &mut Response<Bytes>, destination: &mut dyn Destination)
    -> Result<()>;
}

impl std::fmt::Debug for dyn ResponseDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResponseDecoder")
    }
}

/// Decodes a JSON body into the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ResponseDecoder for JsonDecoder {
    fn decode(
        &self,
        response: &mut Response<Bytes>,
        destination: &mut dyn Destination,
    ) -> Result<()> {
        let mut reader = response.body_mut().reader();
        destination.deserialize_json(&mut reader)
    }
}

/// Copies the whole body into a `Vec<u8>` or `String` destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl ResponseDecoder for RawDecoder {
    fn decode(
        &self,
        response: &mut Response<Bytes>,
        destination: &mut dyn Destination,
    ) -> Result<()> {
        let type_name = destination.type_name();
        let sink = destination.as_any_mut();

        if let Some(buffer) = sink.downcast_mut::<Vec<u8>>() {
            *buffer = take_body(response).to_vec();
            Ok(())
        } else if let Some(text) = sink.downcast_mut::<String>() {
            *text = String::from_utf8(take_body(response).to_vec())?;
            Ok(())
        } else {
            Err(Error::UnsupportedDestination(type_name))
        }
    }
}

fn take_body(response: &mut Response<Bytes>) -> Bytes {
    let body = response.body_mut();
    body.split_to(body.len())
}
