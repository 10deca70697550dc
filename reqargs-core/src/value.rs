//! Raw values and the containers they are looked up in.
//!
//! A request location (query string, headers, a JSON document, ...) is
//! exposed to the core as a [`KeyValues`] container. [`get_value`] reads a
//! single field out of such a container and returns an [`Extracted`]: either
//! the raw JSON value or the [`Extracted::Missing`] sentinel.
//!
//! ## Multi-valued fields
//!
//! Fields that expect several values (lists, nested collections) receive
//! every value stored under the key when the container is multi-valued
//! (see [`KeyValues::lookup_all`]). Otherwise a JSON array is passed through
//! unchanged and a scalar is wrapped into a one-element array.

use serde_json::Value;

use crate::Field;

/// Result of looking up a single argument.
///
/// `Missing` is distinct from every real value, including JSON `null`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Extracted {
    /// The request did not carry the argument.
    #[default]
    Missing,
    /// Raw, not yet validated value.
    Found(Value),
}

impl Extracted {
    /// Returns `true` for [`Extracted::Missing`].
    pub fn is_missing(&self) -> bool {
        matches!(self, Extracted::Missing)
    }

    /// Converts into an `Option`, mapping `Missing` to `None`.
    pub fn into_option(self) -> Option<Value> {
        match self {
            Extracted::Missing => None,
            Extracted::Found(value) => Some(value),
        }
    }

    /// Borrows the found value, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Extracted::Missing => None,
            Extracted::Found(value) => Some(value),
        }
    }
}

impl From<Option<Value>> for Extracted {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Extracted::Missing, Extracted::Found)
    }
}

impl From<Value> for Extracted {
    fn from(value: Value) -> Self {
        Extracted::Found(value)
    }
}

impl From<&str> for Extracted {
    fn from(value: &str) -> Self {
        Extracted::Found(Value::String(value.to_owned()))
    }
}

/// A key-value container a location exposes to [`get_value`].
pub trait KeyValues {
    /// The first value stored under `key`.
    fn lookup(&self, key: &str) -> Extracted;

    /// Every value stored under `key`, in request order.
    ///
    /// Containers that cannot hold repeated keys return `None` and let
    /// [`get_value`] normalize the single value instead.
    fn lookup_all(&self, _key: &str) -> Option<Vec<Value>> {
        None
    }

    /// The whole container as a collection, if it is one.
    ///
    /// Used for nested many-fields that may receive a top-level array.
    fn as_collection(&self) -> Option<Vec<Value>> {
        None
    }
}

impl<T> KeyValues for &T
where
    T: KeyValues + ?Sized,
{
    fn lookup(&self, key: &str) -> Extracted {
        (**self).lookup(key)
    }

    fn lookup_all(&self, key: &str) -> Option<Vec<Value>> {
        (**self).lookup_all(key)
    }

    fn as_collection(&self) -> Option<Vec<Value>> {
        (**self).as_collection()
    }
}

impl KeyValues for Value {
    fn lookup(&self, key: &str) -> Extracted {
        self.as_object()
            .and_then(|object| object.get(key))
            .cloned()
            .into()
    }

    fn as_collection(&self) -> Option<Vec<Value>> {
        self.as_array().cloned()
    }
}

/// Ordered multi-valued string map.
///
/// Backs query strings, form bodies, cookies and match info. Repeated keys
/// keep every value in the order they were received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDict {
    entries: Vec<(String, String)>,
}

impl MultiDict {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value, keeping earlier values for the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Every value for `key`.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns `true` if at least one value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no pairs are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for MultiDict
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl KeyValues for MultiDict {
    fn lookup(&self, key: &str) -> Extracted {
        self.get(key).map(|value| Value::String(value.to_owned())).into()
    }

    fn lookup_all(&self, key: &str) -> Option<Vec<Value>> {
        Some(
            self.get_all(key)
                .map(|value| Value::String(value.to_owned()))
                .collect(),
        )
    }
}

/// Reads the raw value of `field` stored under `name` in `data`.
///
/// `allow_many_nested` lets a nested many-field receive the whole container
/// when the container itself is a collection (a JSON body that is a
/// top-level array).
pub fn get_value<C>(data: &C, name: &str, field: &Field, allow_many_nested: bool) -> Extracted
where
    C: KeyValues + ?Sized,
{
    if allow_many_nested && field.kind().is_many_nested() {
        if let Some(items) = data.as_collection() {
            return Extracted::Found(Value::Array(items));
        }
    }

    let value = match data.lookup(name) {
        Extracted::Missing => return Extracted::Missing,
        Extracted::Found(value) => value,
    };
    if !field.is_multiple() {
        return Extracted::Found(value);
    }
    if let Some(values) = data.lookup_all(name) {
        return Extracted::Found(Value::Array(values));
    }
    match value {
        Value::Array(_) | Value::Null => Extracted::Found(value),
        scalar => Extracted::Found(Value::Array(vec![scalar])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, Schema};
    use serde_json::json;

    fn query() -> MultiDict {
        [("name", "ferris"), ("tag", "a"), ("tag", "b")]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_single_value() {
        let field = Field::string("name");
        assert_eq!(get_value(&query(), "name", &field, false), Extracted::from("ferris"));
    }

    #[test]
    fn test_missing_key() {
        let field = Field::string("age");
        assert!(get_value(&query(), "age", &field, false).is_missing());
    }

    #[test]
    fn test_single_field_takes_first_of_repeated() {
        let field = Field::string("tag");
        assert_eq!(get_value(&query(), "tag", &field, false), Extracted::from("a"));
    }

    #[test]
    fn test_multiple_collects_repeated_keys() {
        let field = Field::list("tag", FieldKind::String);
        assert_eq!(
            get_value(&query(), "tag", &field, false),
            Extracted::Found(json!(["a", "b"]))
        );
    }

    #[test]
    fn test_multiple_missing_stays_missing() {
        let field = Field::list("color", FieldKind::String);
        assert!(get_value(&query(), "color", &field, false).is_missing());
    }

    #[test]
    fn test_json_multiple_wraps_scalar() {
        let body = json!({"ids": 7, "names": ["x"], "none": null});
        let ids = Field::list("ids", FieldKind::Integer);
        let names = Field::list("names", FieldKind::String);
        let none = Field::list("none", FieldKind::String);

        assert_eq!(get_value(&body, "ids", &ids, false), Extracted::Found(json!([7])));
        assert_eq!(get_value(&body, "names", &names, false), Extracted::Found(json!(["x"])));
        assert_eq!(get_value(&body, "none", &none, false), Extracted::Found(Value::Null));
    }

    #[test]
    fn test_json_null_is_not_missing() {
        let body = json!({"name": null});
        let field = Field::string("name");
        assert_eq!(get_value(&body, "name", &field, false), Extracted::Found(Value::Null));
    }

    #[test]
    fn test_json_array_body_for_many_nested() {
        let body = json!([{"id": 1}, {"id": 2}]);
        let field = Field::nested_many("users", Schema::new().field(Field::integer("id")));

        assert_eq!(get_value(&body, "users", &field, true), Extracted::Found(body.clone()));
        assert!(get_value(&body, "users", &field, false).is_missing());
    }

    #[test]
    fn test_non_object_json_is_missing() {
        let body = json!("just a string");
        let field = Field::string("name");
        assert!(get_value(&body, "name", &field, true).is_missing());
    }
}
