//! Axum integration for reqargs.
//!
//! [`Args<T>`] is an extractor that parses a handler's arguments out of the
//! query string, body, headers, cookies and path parameters, then
//! deserializes them into `T`. A failed validation never reaches the
//! handler: the extractor rejects with the translated error response.
//!
//! The parser is taken from the request extensions. Install a configured
//! one with [`ParserLayer`], otherwise a default parser (locations `query`,
//! `form`, `json`, status 422) is used.
//!
//! ```
//! use axum::{Router, routing::post};
//! use reqargs_axum::{ArgSchema, Args, ParserLayer};
//! use reqargs_core::{Field, Location, Schema};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CreateUser {
//!     id: i64,
//!     name: String,
//!     admin: bool,
//! }
//!
//! impl ArgSchema for CreateUser {
//!     fn schema() -> Schema {
//!         Schema::new()
//!             .field(Field::integer("id").location(Location::MatchInfo).required())
//!             .field(Field::string("name").required())
//!             .field(Field::boolean("admin").default(false.into()))
//!     }
//! }
//!
//! async fn create(Args(user): Args<CreateUser>) -> String {
//!     format!("{} {} {}", user.id, user.name, user.admin)
//! }
//!
//! let app: Router = Router::new()
//!     .route("/users/{id}", post(create))
//!     .layer(ParserLayer::default().with_error_status(400));
//! ```
//!
//! # Rejections
//!
//! | Cause | Response |
//! |-------|----------|
//! | validation failure | the registered error class for the status, JSON messages |
//! | invalid JSON body | 400 with `{"json": ["Invalid JSON body."]}` |
//! | body over the limit | 413 |
//! | unreadable body, type mismatch | 400 |
//! | unsupported location, unregistered status | 500 |

#![warn(missing_docs)]

mod extract;
mod layer;
mod rejection;

pub use extract::{ArgSchema, Args};
pub use layer::{ParserLayer, ParserService};
pub use rejection::ArgsRejection;

/// Parser type stored in the request extensions.
pub type AxumParser = reqargs_http::HttpParser<axum::body::Body>;
