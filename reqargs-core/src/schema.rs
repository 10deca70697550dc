//! Schemas: ordered sets of fields and the validation step.
//!
//! [`Schema::load`] receives the raw values the parser extracted (one
//! [`Extracted`] per field) and produces the argument map handed to the
//! handler. Raw values coming from string-only locations (query, form,
//! headers, ...) are coerced into the field's kind, so `"42"` becomes `42`
//! for an integer field. Every failure is collected; the result is either
//! the full argument map or a [`ValidationError`] listing all problems.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::{Extracted, Field, FieldKind, ValidationError};

/// Parsed arguments, keyed by field name.
pub type Args = Map<String, Value>;

const MISSING_REQUIRED: &str = "Missing data for required field.";
const NULL_VALUE: &str = "Field may not be null.";
const INVALID_STRING: &str = "Not a valid string.";
const INVALID_INTEGER: &str = "Not a valid integer.";
const INVALID_NUMBER: &str = "Not a valid number.";
const INVALID_BOOLEAN: &str = "Not a valid boolean.";
const INVALID_LIST: &str = "Not a valid list.";
const INVALID_INPUT: &str = "Invalid input type.";

const TRUTHY: [&str; 6] = ["true", "t", "1", "yes", "y", "on"];
const FALSY: [&str; 6] = ["false", "f", "0", "no", "n", "off"];

/// Declarative description of the arguments a handler expects.
///
/// ```
/// use std::collections::HashMap;
/// use reqargs_core::{Extracted, Field, Schema};
///
/// let schema = Schema::new()
///     .field(Field::string("name").required())
///     .field(Field::integer("age"));
///
/// let raw = HashMap::from([
///     ("name".to_owned(), Extracted::from("Ferris")),
///     ("age".to_owned(), Extracted::from("7")),
/// ]);
/// let args = schema.load(&raw).unwrap();
/// assert_eq!(args["age"], 7);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Validates raw values keyed by field name.
    ///
    /// Fields absent from `raw` are treated as [`Extracted::Missing`].
    pub fn load(&self, raw: &HashMap<String, Extracted>) -> Result<Args, ValidationError> {
        let mut errors = ValidationError::new();
        let args = self.load_fields(
            |field| raw.get(field.name()).cloned().unwrap_or_default(),
            "",
            &mut errors,
        );
        if errors.is_empty() { Ok(args) } else { Err(errors) }
    }

    /// Validates a JSON object, reading each field from its request key.
    pub fn load_object(&self, value: &Value) -> Result<Args, ValidationError> {
        let mut errors = ValidationError::new();
        let args = match value {
            Value::Object(object) => self.load_fields(
                |field| object.get(field.key()).cloned().into(),
                "",
                &mut errors,
            ),
            _ => {
                errors.add("_schema", INVALID_INPUT);
                Args::new()
            }
        };
        if errors.is_empty() { Ok(args) } else { Err(errors) }
    }

    fn load_fields<F>(&self, lookup: F, prefix: &str, errors: &mut ValidationError) -> Args
    where
        F: Fn(&Field) -> Extracted,
    {
        let mut args = Args::new();
        for field in &self.fields {
            let path = join_path(prefix, field.name());
            match lookup(field) {
                Extracted::Missing => {
                    if let Some(default) = field.default_value() {
                        args.insert(field.name().to_owned(), default.clone());
                    } else if field.is_required() {
                        errors.add(path, MISSING_REQUIRED);
                    }
                }
                Extracted::Found(value) => {
                    if let Some(value) = load_field(field, value, &path, errors) {
                        args.insert(field.name().to_owned(), value);
                    }
                }
            }
        }
        args
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}.{name}")
    }
}

fn load_field(
    field: &Field,
    value: Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<Value> {
    if value.is_null() && !matches!(field.kind(), FieldKind::Any) {
        errors.add(path, NULL_VALUE);
        return None;
    }
    let value = coerce(field.kind(), value, path, errors)?;

    let mut valid = true;
    for validator in field.validators() {
        if let Err(message) = validator(&value) {
            errors.add(path, message);
            valid = false;
        }
    }
    valid.then_some(value)
}

fn coerce(
    kind: &FieldKind,
    value: Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<Value> {
    let coerced = match kind {
        FieldKind::String => match value {
            Value::String(_) => Some(value),
            _ => None,
        },
        FieldKind::Integer => to_integer(&value).map(Value::from),
        FieldKind::Float => to_float(&value).and_then(Number::from_f64).map(Value::Number),
        FieldKind::Boolean => to_bool(&value).map(Value::Bool),
        FieldKind::Any => Some(value),
        FieldKind::List(item) => return coerce_list(item, value, path, errors),
        FieldKind::Nested {
            schema,
            many: false,
        } => return load_nested(schema, value, path, errors),
        FieldKind::Nested { schema, many: true } => {
            return load_nested_many(schema, value, path, errors);
        }
    };
    if coerced.is_none() {
        errors.add(path, invalid_message(kind));
    }
    coerced
}

fn invalid_message(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::String => INVALID_STRING,
        FieldKind::Integer => INVALID_INTEGER,
        FieldKind::Float => INVALID_NUMBER,
        FieldKind::Boolean => INVALID_BOOLEAN,
        FieldKind::List(_) => INVALID_LIST,
        FieldKind::Any | FieldKind::Nested { .. } => INVALID_INPUT,
    }
}

fn coerce_list(
    item: &FieldKind,
    value: Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<Value> {
    let Value::Array(values) = value else {
        errors.add(path, INVALID_LIST);
        return None;
    };
    let mut failed = false;
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let item_path = join_path(path, &index.to_string());
        if value.is_null() && !matches!(item, FieldKind::Any) {
            errors.add(item_path, NULL_VALUE);
            failed = true;
            continue;
        }
        match coerce(item, value, &item_path, errors) {
            Some(value) => items.push(value),
            None => failed = true,
        }
    }
    (!failed).then_some(Value::Array(items))
}

fn load_nested(
    schema: &Schema,
    value: Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<Value> {
    let Value::Object(object) = value else {
        errors.add(path, INVALID_INPUT);
        return None;
    };
    let mut nested = ValidationError::new();
    let args = schema.load_fields(
        |field| object.get(field.key()).cloned().into(),
        path,
        &mut nested,
    );
    if nested.is_empty() {
        Some(Value::Object(args))
    } else {
        errors.merge(nested);
        None
    }
}

fn load_nested_many(
    schema: &Schema,
    value: Value,
    path: &str,
    errors: &mut ValidationError,
) -> Option<Value> {
    let Value::Array(values) = value else {
        errors.add(path, INVALID_INPUT);
        return None;
    };
    let mut failed = false;
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match load_nested(schema, value, &join_path(path, &index.to_string()), errors) {
            Some(item) => items.push(item),
            None => failed = true,
        }
    }
    (!failed).then_some(Value::Array(items))
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|float| float.is_finite()),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(text) => {
            let lowered = text.trim().to_ascii_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSY.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}
