//! Prelude module for convenient imports.
//!
//! ```ignore
//! use sling::prelude::*;
//! ```

pub use crate::{
    BodyProvider, ClientConfig, ContentType, Error, FormBody, HttpClient, HyperClient, JsonBody,
    JsonDecoder, Method, RawBody, RawDecoder, Request, Response, ResponseDecoder, Result,
    ServiceClient, Sling, StatusCode, header,
};
pub use serde::{Deserialize, Serialize};
