//! Parser configuration.
//!
//! ```yaml
//! locations: [query, json]
//! error_status: 400
//! error_headers:
//!   x-error-source: arguments
//! body_limit: 65536
//! ```

use std::collections::BTreeMap;

use http::{HeaderMap, HeaderName, HeaderValue};
use reqargs_core::{DEFAULT_VALIDATION_STATUS, Location};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::exceptions::error_class;

/// Error building a parser from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration document: {0}")]
    Yaml(String),

    #[error("no error class registered for status {0}")]
    UnregisteredStatus(u16),

    #[error("at least one default location is required")]
    NoLocations,

    #[error("invalid header name `{name}`")]
    InvalidHeaderName {
        name: String,
        #[source]
        error: http::header::InvalidHeaderName,
    },

    #[error("invalid value for header `{name}`")]
    InvalidHeaderValue {
        name: String,
        #[source]
        error: http::header::InvalidHeaderValue,
    },
}

/// Declarative [`HttpParser`](crate::HttpParser) settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lookup order for fields without a pinned location.
    pub locations: Vec<Location>,
    /// Status of validation error responses.
    pub error_status: u16,
    /// Headers added to every validation error response.
    pub error_headers: BTreeMap<String, String>,
    /// Maximum body size in bytes read for form and JSON arguments.
    pub body_limit: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            locations: Location::DEFAULT_ORDER.to_vec(),
            error_status: DEFAULT_VALIDATION_STATUS,
            error_headers: BTreeMap::new(),
            body_limit: None,
        }
    }
}

impl ParserConfig {
    pub fn from_yaml(document: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(document).map_err(|error| ConfigError::Yaml(error.to_string()))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }
        if error_class(self.error_status).is_none() {
            return Err(ConfigError::UnregisteredStatus(self.error_status));
        }
        Ok(())
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::with_capacity(self.error_headers.len());
        for (name, value) in &self.error_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|error| {
                ConfigError::InvalidHeaderName {
                    name: name.clone(),
                    error,
                }
            })?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|error| {
                ConfigError::InvalidHeaderValue {
                    name: name.clone(),
                    error,
                }
            })?;
            headers.append(header_name, header_value);
        }
        Ok(headers)
    }
}
