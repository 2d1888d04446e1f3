//! Query string merging.
//!
//! Query sources are any [`serde::Serialize`] values; their fields become
//! query keys following `serde_html_form` conventions. [`merge_queries`]
//! appends every source onto a URL's existing query and re-encodes it with
//! keys in sorted order.

use std::collections::BTreeMap;
use std::sync::Arc;

use url::{Url, form_urlencoded};

use crate::Result;

/// Query values keyed by name, each key keeping its values in order.
pub(crate) type QueryValues = BTreeMap<String, Vec<String>>;

/// A value that can be turned into query parameter pairs.
///
/// Implemented for every `Serialize + Send + Sync` type:
///
/// ```
/// use sling_core::QuerySource;
///
/// #[derive(serde::Serialize)]
/// struct Page {
///     page: u32,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     per_page: Option<u32>,
/// }
///
/// let pairs = Page { page: 2, per_page: None }.query_pairs().expect("pairs");
/// assert_eq!(pairs, vec![("page".to_string(), "2".to_string())]);
/// ```
pub trait QuerySource: Send + Sync {
    /// Convert this value to key-value pairs, in field order.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented as query pairs.
    fn query_pairs(&self) -> Result<Vec<(String, String)>>;
}

impl<T> QuerySource for T
where
    T: serde::Serialize + Send + Sync,
{
    fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        let encoded = crate::to_query_string(self)?;
        Ok(form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect())
    }
}

impl std::fmt::Debug for dyn QuerySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QuerySource")
    }
}

/// Append every source's pairs to the URL's query, sorted by key.
///
/// Existing parameters are kept, and a key present in several sources
/// accumulates all values (`a=1&a=2`), never replaced. When the resulting
/// query is empty the URL has no `?` at all.
///
/// On error the URL is left untouched.
///
/// # Errors
///
/// Returns an error if any source fails to serialize.
pub fn merge_queries(url: &mut Url, sources: &[Arc<dyn QuerySource>]) -> Result<()> {
    let mut values = QueryValues::new();
    append_encoded(&mut values, url.query().unwrap_or_default().as_bytes());

    for source in sources {
        for (key, value) in source.query_pairs()? {
            values.entry(key).or_default().push(value);
        }
    }

    let encoded = encode_sorted(&values);
    url.set_query((!encoded.is_empty()).then_some(encoded.as_str()));
    Ok(())
}

pub(crate) fn append_encoded(values: &mut QueryValues, encoded: &[u8]) {
    for (key, value) in form_urlencoded::parse(encoded).into_owned() {
        values.entry(key).or_default().push(value);
    }
}

pub(crate) fn encode_sorted(values: &QueryValues) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, list) in values {
        for value in list {
            serializer.append_pair(key, value);
        }
    }
    serializer.finish()
}
