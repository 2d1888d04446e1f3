//! Fluent HTTP request builder for Rust.
//!
//! A [`Sling`] accumulates method, URL, headers, query parameters, a body
//! provider and a response decoder through chained calls. A configured
//! `Sling` is a reusable template: [`Sling::try_clone`] derives independent
//! builders for each endpoint.
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use sling::{JsonDecoder, Sling};
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Issue {
//!     number: u64,
//!     title: String,
//! }
//!
//! #[derive(Serialize)]
//! struct IssueParams {
//!     state: &'static str,
//!     per_page: u32,
//! }
//!
//! let github = Sling::default()
//!     .base("https://api.github.com/")
//!     .set_header("User-Agent", "sling")
//!     .response_decoder(JsonDecoder);
//!
//! let mut issues: Vec<Issue> = Vec::new();
//! github
//!     .try_clone()?
//!     .get("repos/rust-lang/rust/issues")
//!     .add_query(IssueParams { state: "open", per_page: 5 })
//!     .receive(&mut issues)
//!     .await?;
//! ```

mod builder;
mod config;
pub mod prelude;
mod service;
mod transport;

pub use builder::Sling;
pub use config::ClientConfig;
pub use service::ServiceClient;
pub use transport::HyperClient;

// For stacking middleware in front of `ServiceClient`
pub use tower;

pub use sling_core::{
    BodyProvider, ContentType, Destination, Error, FormBody, HttpClient, JsonBody, JsonDecoder,
    Method, QuerySource, RawBody, RawDecoder, Request, RequestBuilder, Response, ResponseDecoder,
    Result, from_json, merge_queries, to_form, to_json, to_query_string,
};

pub use sling_core::{HeaderMap, StatusCode, header};

pub use url;
