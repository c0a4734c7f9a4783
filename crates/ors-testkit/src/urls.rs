//! # URL Equivalence
//!
//! The client builds request URLs from parameter maps whose iteration order
//! is not something tests should depend on. Two URLs are equivalent when
//! scheme, authority and path are identical and their query strings hold
//! the same `(key, value)` pairs in any order.
//!
//! Duplicate keys are kept as separate pairs, so `a=1&a=2` and `a=2&a=1`
//! are equivalent while `a=1&a=2` and `a=1` are not. Query pairs are
//! percent- and `+`-decoded before comparison. A key with no value decodes
//! to `(key, "")`, which is distinct from the key being absent.
//!
//! Parsing goes through the `url` crate, so hosts are lowercased and a
//! port equal to the scheme default is dropped before comparison. The path
//! is compared exactly as written in the input: `http://x` and `http://x/`
//! differ, as do `/a b` and `/a%20b`. The fragment is ignored.

use thiserror::Error;
use url::Url;

/// Error raised when an input is not an absolute URL.
#[derive(Error, Debug)]
pub enum UrlCompareError {
    #[error("cannot parse URL '{url}': {source}")]
    Parse {
        /// The rejected input.
        url: String,
        /// Underlying parser error.
        source: url::ParseError,
    },
}

/// The parts of a URL that take part in equivalence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparableUrl {
    pub scheme: String,
    /// `user:password@host:port`, with absent parts omitted.
    pub authority: String,
    /// Path as written in the input, empty when there is none.
    pub path: String,
    /// Decoded query pairs, sorted.
    pub query: Vec<(String, String)>,
}

impl ComparableUrl {
    /// Parse `input` into its comparable parts.
    ///
    /// # Errors
    ///
    /// Returns `UrlCompareError::Parse` if `input` is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, UrlCompareError> {
        let url = Url::parse(input).map_err(|source| UrlCompareError::Parse {
            url: input.to_string(),
            source,
        })?;
        Ok(Self {
            scheme: url.scheme().to_string(),
            authority: authority(&url),
            path: raw_path(input).to_string(),
            query: sorted_query_pairs(&url),
        })
    }
}

/// Decoded query pairs of `url`, sorted by key then value.
pub fn sorted_query_pairs(url: &Url) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();
    pairs
}

/// The path slice of `input`, before percent-encoding or dot-segment
/// normalisation.
fn raw_path(input: &str) -> &str {
    let input = input.trim();
    let end = input.find(&['?', '#'][..]).unwrap_or(input.len());
    let head = &input[..end];
    match head.find("://") {
        Some(i) => {
            let rest = &head[i + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => head.split_once(':').map_or(head, |(_, path)| path),
    }
}

fn authority(url: &Url) -> String {
    let mut out = String::new();
    if !url.username().is_empty() || url.password().is_some() {
        out.push_str(url.username());
        if let Some(password) = url.password() {
            out.push(':');
            out.push_str(password);
        }
        out.push('@');
    }
    if let Some(host) = url.host_str() {
        out.push_str(host);
    }
    if let Some(port) = url.port() {
        out.push(':');
        out.push_str(&port.to_string());
    }
    out
}

/// Whether two URLs are equivalent, ignoring query-parameter order.
///
/// # Errors
///
/// Returns `UrlCompareError::Parse` if either input is not an absolute URL.
pub fn url_equivalent(first: &str, second: &str) -> Result<bool, UrlCompareError> {
    Ok(ComparableUrl::parse(first)? == ComparableUrl::parse(second)?)
}

/// Assert that two URLs are equivalent.
///
/// # Panics
///
/// Panics if either URL fails to parse or the two differ in scheme,
/// authority, path or query pairs. The message lists the sorted pairs of
/// both sides.
#[track_caller]
pub fn assert_url_equal(first: &str, second: &str) {
    let parse = |input: &str| match ComparableUrl::parse(input) {
        Ok(parts) => parts,
        Err(e) => panic!("assert_url_equal: {e}"),
    };
    let (a, b) = (parse(first), parse(second));
    if a != b {
        tracing::debug!(first, second, "URL mismatch");
        panic!(
            "URLs differ\n  left:  {first}\n  right: {second}\n  left parts:  {a:?}\n  right parts: {b:?}"
        );
    }
}
