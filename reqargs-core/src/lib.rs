#![warn(missing_docs)]
//! # reqargs-core
//!
//! Core traits and types for request argument parsing.
//!
//! This crate is **protocol-agnostic**: it knows nothing about HTTP. It
//! defines what an argument is ([`Field`]), where it may come from
//! ([`Location`]), how a raw value is looked up in a key-value container
//! ([`get_value`]) and how the collected raw values are validated
//! ([`Schema::load`]). Protocol crates such as `reqargs-http` implement the
//! [`Parser`] trait to pull raw values out of their own request type.
//!
//! ## Outcomes
//!
//! Every lookup ends in one of three ways:
//!
//! - the value is absent: [`Extracted::Missing`]
//! - the value is present but invalid: [`ValidationError`]
//! - the operation is not supported: [`ParseError::Unsupported`]
//!
//! ```
//! use reqargs_core::{Extracted, Field, MultiDict, get_value};
//!
//! let query: MultiDict = [("page", "2")].into_iter().collect();
//! let page = Field::integer("page");
//!
//! assert_eq!(get_value(&query, "page", &page, false), Extracted::from("2"));
//! assert!(get_value(&query, "limit", &page, false).is_missing());
//! ```

pub mod content;
pub mod error;
pub mod field;
pub mod location;
pub mod parser;
pub mod schema;
pub mod value;

pub use content::is_json;
pub use error::{ParseError, ValidationError};
pub use field::{Field, FieldKind, Validator};
pub use location::Location;
pub use parser::Parser;
pub use schema::{Args, Schema};
pub use value::{Extracted, KeyValues, MultiDict, get_value};

/// Status code used for validation failures when nothing else is configured.
pub const DEFAULT_VALIDATION_STATUS: u16 = 422;
