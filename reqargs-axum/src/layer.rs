use std::task::{Context, Poll};

use http::{HeaderName, HeaderValue, Request};
use reqargs_core::Location;
use reqargs_http::{ConfigError, ParserConfig};
use tower::{Layer, Service};

use crate::AxumParser;

/// Tower layer that makes a parser available to [`Args`](crate::Args).
///
/// ```
/// use reqargs_axum::ParserLayer;
/// use reqargs_http::ParserConfig;
///
/// let config = ParserConfig::from_yaml("error_status: 400").unwrap();
/// let layer = ParserLayer::from_config(&config).unwrap();
/// assert_eq!(layer.parser().error_status(), 400);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ParserLayer {
    parser: AxumParser,
}

impl ParserLayer {
    /// Wraps an already configured parser.
    pub fn new(parser: AxumParser) -> Self {
        ParserLayer { parser }
    }

    /// Builds the parser from configuration.
    pub fn from_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        AxumParser::from_config(config).map(Self::new)
    }

    /// Sets the default lookup order.
    pub fn with_locations(self, locations: impl IntoIterator<Item = Location>) -> Self {
        Self::new(self.parser.with_locations(locations))
    }

    /// Sets the default validation error status.
    pub fn with_error_status(self, status: u16) -> Self {
        Self::new(self.parser.with_error_status(status))
    }

    /// Adds a header to every validation error response.
    pub fn with_error_header(self, name: HeaderName, value: HeaderValue) -> Self {
        Self::new(self.parser.with_error_header(name, value))
    }

    /// Limits the size of bodies read for form and JSON arguments.
    pub fn with_body_limit(self, limit: usize) -> Self {
        Self::new(self.parser.with_body_limit(limit))
    }

    /// The parser handed to every request.
    pub fn parser(&self) -> &AxumParser {
        &self.parser
    }
}

impl<S> Layer<S> for ParserLayer {
    type Service = ParserService<S>;

    fn layer(&self, upstream: S) -> Self::Service {
        ParserService {
            upstream,
            parser: self.parser.clone(),
        }
    }
}

/// Service produced by [`ParserLayer`].
#[derive(Clone, Debug)]
pub struct ParserService<S> {
    upstream: S,
    parser: AxumParser,
}

impl<S, ReqBody> Service<Request<ReqBody>> for ParserService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.upstream.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        req.extensions_mut().insert(self.parser.clone());
        self.upstream.call(req)
    }
}
