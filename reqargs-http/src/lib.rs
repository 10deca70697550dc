//! # reqargs-http
//!
//! Binds the `reqargs-core` parser to [`http::Request`].
//!
//! - [`ArgsRequest`] wraps a request and memoizes its body, form and JSON
//!   document so the body stream is read at most once.
//! - [`HttpParser`] reads each [`Location`](reqargs_core::Location) out of
//!   an [`ArgsRequest`].
//! - [`exceptions`] holds the status code → error class table used to turn
//!   a [`ValidationError`](reqargs_core::ValidationError) into an
//!   [`HttpError`] response.
//!
//! ```
//! # #[tokio::main]
//! # async fn main() {
//! use bytes::Bytes;
//! use http_body_util::Empty;
//! use reqargs_core::{Field, Parser, Schema};
//! use reqargs_http::{ArgsRequest, HttpParser};
//!
//! let request = http::Request::builder()
//!     .uri("/search?q=rust&page=2")
//!     .body(Empty::<Bytes>::new())
//!     .unwrap();
//! let mut request = ArgsRequest::from_request(request);
//!
//! let schema = Schema::new()
//!     .field(Field::string("q").required())
//!     .field(Field::integer("page"));
//! let parser: HttpParser<Empty<Bytes>> = HttpParser::new();
//! let args = parser.parse(&schema, &mut request).await.unwrap();
//!
//! assert_eq!(args["q"], "rust");
//! assert_eq!(args["page"], 2);
//! # }
//! ```

pub mod body;
pub mod config;
pub mod cookies;
pub mod exceptions;
pub mod headers;
#[cfg(feature = "metrics")]
mod metrics;
pub mod multipart;
mod parser;
pub mod query;
mod request;
mod response;

pub use body::{BodyError, BufferedBody};
pub use config::{ConfigError, ParserConfig};
pub use exceptions::{ErrorClass, ErrorFamily, error_class};
pub use parser::HttpParser;
pub use request::ArgsRequest;
pub use response::HttpError;
