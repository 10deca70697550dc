//! Header lookup for argument parsing.

use http::{HeaderMap, HeaderValue};
use reqargs_core::{Extracted, KeyValues};
use serde_json::Value;

/// Read-only [`KeyValues`] view over a [`HeaderMap`].
///
/// Lookups are case-insensitive. Values that are not valid UTF-8 are decoded
/// lossily rather than dropped.
#[derive(Debug, Clone, Copy)]
pub struct Headers<'a>(pub &'a HeaderMap);

fn to_value(value: &HeaderValue) -> Value {
    Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned())
}

impl KeyValues for Headers<'_> {
    fn lookup(&self, key: &str) -> Extracted {
        self.0.get(key).map(to_value).into()
    }

    fn lookup_all(&self, key: &str) -> Option<Vec<Value>> {
        Some(self.0.get_all(key).iter().map(to_value).collect())
    }
}
