//! Shared value types passed between the dispatcher, the guard and storage.

use percent_encoding::percent_decode_str;
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;

/// A stored resource: an arbitrary JSON object.
///
/// The core never inspects its shape, it only moves it between the request
/// body, the storage backend and the response envelope.
pub type Resource = serde_json::Map<String, serde_json::Value>;

/// A query string that cannot be decoded without losing information.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid percent escape in '{0}'")]
    InvalidEscape(String),
    #[error("invalid utf-8 in '{0}'")]
    InvalidUtf8(String),
}

/// URL query parameters as a string multimap.
///
/// Passed verbatim to the guard and to storage; repeated keys keep every
/// value in the order they appeared in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Vec<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a raw `application/x-www-form-urlencoded` query string.
    ///
    /// Unlike lenient form parsing, a broken escape or a non-UTF-8 byte
    /// sequence is an error instead of being replaced.
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let mut params = QueryParams::new();
        for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(decode_component(key)?, decode_component(value)?);
        }
        Ok(params)
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`, empty if the key is absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

fn decode_component(raw: &str) -> Result<String, QueryError> {
    let bytes = raw.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'%' {
            let escape_ok = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !escape_ok {
                return Err(QueryError::InvalidEscape(raw.to_string()));
            }
        }
    }

    let spaced = raw.replace('+', " ");
    let decoded = percent_decode_str(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| QueryError::InvalidUtf8(raw.to_string()));
    decoded
}
