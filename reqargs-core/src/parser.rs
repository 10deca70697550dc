//! The [`Parser`] trait.
//!
//! A parser knows how to read one raw value from one [`Location`] of its
//! request type ([`Parser::parse_arg`]). The provided methods resolve which
//! locations to try for a field and run the collected values through the
//! schema.
//!
//! ## Location resolution
//!
//! A field pinned to a location is read only from there. Other fields try
//! [`Parser::locations`] in order; the first non-missing value wins.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::trace;

use crate::{Args, Extracted, Field, Location, ParseError, Schema};

/// Reads request arguments from a protocol-specific request type.
///
/// The request is borrowed mutably so implementations can memoize work
/// (such as a decoded body) on it for the rest of the request.
#[async_trait]
pub trait Parser: Send + Sync {
    /// The request type this parser reads from.
    type Request: Send;

    /// Default lookup order for fields without a pinned location.
    fn locations(&self) -> &[Location] {
        &Location::DEFAULT_ORDER
    }

    /// Reads the raw value of `field` from `location`.
    async fn parse_arg(
        &self,
        request: &mut Self::Request,
        location: Location,
        field: &Field,
    ) -> Result<Extracted, ParseError>;

    /// Reads the raw value of `field`, resolving its location.
    async fn extract(
        &self,
        request: &mut Self::Request,
        field: &Field,
    ) -> Result<Extracted, ParseError> {
        if let Some(location) = field.pinned_location() {
            return self.parse_arg(request, location, field).await;
        }
        for location in self.locations() {
            let value = self.parse_arg(request, *location, field).await?;
            if !value.is_missing() {
                trace!(field = field.name(), %location, "argument found");
                return Ok(value);
            }
        }
        Ok(Extracted::Missing)
    }

    /// Extracts every field of `schema` and validates the result.
    async fn parse(
        &self,
        schema: &Schema,
        request: &mut Self::Request,
    ) -> Result<Args, ParseError> {
        let mut raw = HashMap::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let value = self.extract(request, field).await?;
            raw.insert(field.name().to_owned(), value);
        }
        Ok(schema.load(&raw)?)
    }
}
