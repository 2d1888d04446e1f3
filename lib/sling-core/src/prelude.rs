//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use sling_core::prelude::*;
//! ```

pub use crate::{
    BodyProvider, ContentType, Error, FormBody, HttpClient, JsonBody, JsonDecoder, Method,
    QuerySource, RawBody, RawDecoder, Request, Response, ResponseDecoder, Result, from_json,
    to_form, to_json,
};
