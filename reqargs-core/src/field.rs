//! Declarative argument fields.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Location, Schema};

/// User supplied check run on a coerced value.
///
/// Returns the error message on failure.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// Expected type of an argument.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// UTF-8 string.
    String,
    /// Signed 64-bit integer. Accepts numeric strings.
    Integer,
    /// Finite floating point number. Accepts numeric strings.
    Float,
    /// Boolean. Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
    Boolean,
    /// Any JSON value, passed through unchanged.
    Any,
    /// Homogeneous list.
    List(Box<FieldKind>),
    /// Object validated by its own schema, or a list of them when `many`.
    Nested {
        /// Schema of the nested object.
        schema: Schema,
        /// Expect an array of objects.
        many: bool,
    },
}

impl FieldKind {
    /// Returns `true` for kinds that expect several values.
    pub fn is_multiple(&self) -> bool {
        matches!(self, FieldKind::List(_) | FieldKind::Nested { many: true, .. })
    }

    /// Returns `true` for `Nested { many: true }`.
    pub fn is_many_nested(&self) -> bool {
        matches!(self, FieldKind::Nested { many: true, .. })
    }
}

/// A single expected argument.
///
/// Built with a constructor per kind and refined with builder methods:
///
/// ```
/// use reqargs_core::{Field, Location};
///
/// let field = Field::integer("per_page")
///     .location(Location::Query)
///     .data_key("per-page")
///     .default(serde_json::json!(20))
///     .validate(|value| match value.as_i64() {
///         Some(1..=100) => Ok(()),
///         _ => Err("Must be between 1 and 100.".to_owned()),
///     });
///
/// assert_eq!(field.key(), "per-page");
/// ```
#[derive(Clone)]
pub struct Field {
    name: String,
    data_key: Option<String>,
    location: Option<Location>,
    kind: FieldKind,
    required: bool,
    default: Option<Value>,
    validators: Vec<Validator>,
}

impl Field {
    /// Creates an optional field of the given kind.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            data_key: None,
            location: None,
            kind,
            required: false,
            default: None,
            validators: Vec::new(),
        }
    }

    /// String field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    /// Integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    /// Boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Field accepting any JSON value.
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Any)
    }

    /// List field with items of `item` kind.
    pub fn list(name: impl Into<String>, item: FieldKind) -> Self {
        Self::new(name, FieldKind::List(Box::new(item)))
    }

    /// Nested object field.
    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Nested { schema, many: false })
    }

    /// Nested list-of-objects field.
    pub fn nested_many(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, FieldKind::Nested { schema, many: true })
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Pins the field to a single location.
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Reads the value from `key` instead of the field name.
    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    /// Value used when the argument is missing.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Adds a validator run after coercion.
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Name the parsed value is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key the value is stored under in the request.
    pub fn key(&self) -> &str {
        self.data_key.as_deref().unwrap_or(&self.name)
    }

    /// Location the field is pinned to, if any.
    pub fn pinned_location(&self) -> Option<Location> {
        self.location
    }

    /// Expected kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether a missing value is a validation error.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Value used when the argument is missing.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validators in the order they were added.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Returns `true` if the field expects several values.
    pub fn is_multiple(&self) -> bool {
        self.kind.is_multiple()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("data_key", &self.data_key)
            .field("location", &self.location)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("validators", &self.validators.len())
            .finish()
    }
}
