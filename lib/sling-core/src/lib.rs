//! Core types and traits for the sling fluent HTTP request builder.
//!
//! This crate provides the transport-independent building blocks:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - Client trait for HTTP execution
//! - [`BodyProvider`] with [`JsonBody`], [`FormBody`], [`RawBody`] - request body strategies
//! - [`ResponseDecoder`] with [`JsonDecoder`], [`RawDecoder`] - response body strategies
//! - [`QuerySource`] and [`merge_queries`] - query string accumulation
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod body;
mod client;
mod decode;
mod error;
mod method;
pub mod prelude;
mod provider;
mod query;
mod request;
mod response;

pub use body::{ContentType, from_json, to_form, to_json, to_query_string};
pub use client::HttpClient;
pub use decode::{Destination, JsonDecoder, RawDecoder, ResponseDecoder};
pub use error::{Error, Result};
pub use method::Method;
pub use provider::{BodyProvider, FormBody, JsonBody, RawBody};
pub use query::{QuerySource, merge_queries};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, header};
