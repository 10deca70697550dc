//! Error types for argument parsing.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::Location;

/// Structured validation failure.
///
/// Messages are keyed by field name; fields inside nested schemas use dotted
/// paths (`address.city`, `items.0.id`). The optional status code and
/// headers are hints for the protocol layer that turns the failure into a
/// response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {messages:?}")]
pub struct ValidationError {
    messages: BTreeMap<String, Vec<String>>,
    status_code: Option<u16>,
    headers: Vec<(String, String)>,
}

impl ValidationError {
    /// Creates an error without messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error with a single message for `field`.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.add(field, message);
        error
    }

    /// Records a message for `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Moves every message of `other` into `self`.
    pub fn merge(&mut self, other: ValidationError) {
        for (field, messages) in other.messages {
            self.messages.entry(field).or_default().extend(messages);
        }
    }

    /// Requests a specific response status.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    /// Adds a header to the error response.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Messages keyed by field path.
    pub fn messages(&self) -> &BTreeMap<String, Vec<String>> {
        &self.messages
    }

    /// Returns `true` if no message was recorded.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Requested response status, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Extra response headers.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Messages as a JSON object: `{"field": ["message", ...]}`.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.messages
                .iter()
                .map(|(field, messages)| {
                    let messages = messages.iter().cloned().map(Value::String).collect();
                    (field.clone(), Value::Array(messages))
                })
                .collect(),
        )
    }
}

/// Error type for parsing a request.
#[derive(Debug, Error)]
pub enum ParseError {
    /// One or more arguments failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The location cannot be parsed by this parser.
    #[error("parsing the `{0}` location is not implemented")]
    Unsupported(Location),

    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A non-empty JSON body could not be decoded.
    #[error("request body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// No error class is registered for the requested status code.
    #[error("no error class registered for status {0}")]
    UnregisteredStatus(u16),
}

impl ParseError {
    /// Returns the validation failure, if that is what this error is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ParseError::Validation(error) => Some(error),
            _ => None,
        }
    }
}
