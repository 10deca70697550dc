use std::fmt;
use std::marker::PhantomData;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue};
use hyper::body::Body as HttpBody;
use reqargs_core::{
    DEFAULT_VALIDATION_STATUS, Extracted, Field, Location, ParseError, Parser, ValidationError,
    get_value,
};
use tracing::{debug, warn};

use crate::config::{ConfigError, ParserConfig};
use crate::exceptions::error_class;
use crate::headers::Headers;
use crate::{ArgsRequest, HttpError};

/// Argument parser for [`ArgsRequest`].
///
/// Each [`Location`] maps to one lookup function:
///
/// | Location | Source |
/// |----------|--------|
/// | `query` | URI query string |
/// | `form` | urlencoded or multipart text fields, read once |
/// | `json` | JSON body, read once; empty or non-JSON bodies are missing |
/// | `headers` | header map, case-insensitive |
/// | `cookies` | `Cookie` header |
/// | `match_info` | path-match parameters |
/// | `files` | not supported |
///
/// # Type Parameters
///
/// * `ReqBody` - The HTTP request body type the parser reads from.
pub struct HttpParser<ReqBody> {
    locations: Vec<Location>,
    error_status: u16,
    error_headers: HeaderMap,
    body_limit: Option<usize>,
    _body: PhantomData<fn(ReqBody) -> ReqBody>,
}

impl<ReqBody> HttpParser<ReqBody> {
    /// Creates a parser with the default locations (`query`, `form`,
    /// `json`), status 422 and no body limit.
    pub fn new() -> Self {
        Self {
            locations: Location::DEFAULT_ORDER.to_vec(),
            error_status: DEFAULT_VALIDATION_STATUS,
            error_headers: HeaderMap::new(),
            body_limit: None,
            _body: PhantomData,
        }
    }

    /// Creates a parser from validated configuration.
    pub fn from_config(config: &ParserConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            locations: config.locations.clone(),
            error_status: config.error_status,
            error_headers: config.header_map()?,
            body_limit: config.body_limit,
            _body: PhantomData,
        })
    }

    pub fn with_locations(mut self, locations: impl IntoIterator<Item = Location>) -> Self {
        self.locations = locations.into_iter().collect();
        self
    }

    /// Sets the status used when a validation error does not request one.
    pub fn with_error_status(mut self, status: u16) -> Self {
        self.error_status = status;
        self
    }

    pub fn with_error_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.error_headers.append(name, value);
        self
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    pub fn error_status(&self) -> u16 {
        self.error_status
    }

    pub fn body_limit(&self) -> Option<usize> {
        self.body_limit
    }

    /// Turns a validation failure into an error response.
    ///
    /// The status is `status_code` if given, else the one requested by the
    /// error, else the parser default. Headers are layered in the same
    /// order of precedence: parser defaults, then the error's own, then
    /// `headers`.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnregisteredStatus`] if no error class is registered
    /// for the resulting status.
    pub fn handle_error(
        &self,
        error: &ValidationError,
        status_code: Option<u16>,
        headers: Option<&HeaderMap>,
    ) -> Result<HttpError, ParseError> {
        let code = status_code
            .or(error.status_code())
            .unwrap_or(self.error_status);
        let Some(class) = error_class(code) else {
            warn!(status = code, "no error class registered");
            return Err(ParseError::UnregisteredStatus(code));
        };

        let mut response_headers = self.error_headers.clone();
        for (name, value) in error.headers() {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    response_headers.insert(name, value);
                }
                _ => warn!(header = %name, "dropping invalid validation error header"),
            }
        }
        if let Some(headers) = headers {
            for (name, value) in headers {
                response_headers.insert(name.clone(), value.clone());
            }
        }

        debug!(status = code, fields = error.messages().len(), "validation failed");
        #[cfg(feature = "metrics")]
        crate::metrics::record_validation_error(code);
        Ok(class.build(Bytes::from(error.to_json().to_string()), response_headers))
    }
}

impl<ReqBody> HttpParser<ReqBody>
where
    ReqBody: HttpBody + Send + Unpin,
    ReqBody::Data: Send,
    ReqBody::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    /// Pull a value from the query string.
    pub fn parse_querystring(&self, request: &ArgsRequest<ReqBody>, field: &Field) -> Extracted {
        let query = request
            .parts()
            .uri
            .query()
            .map(crate::query::parse)
            .unwrap_or_default();
        get_value(&query, field.key(), field, false)
    }

    /// Pull a value from the urlencoded form body.
    pub async fn parse_form(
        &self,
        request: &mut ArgsRequest<ReqBody>,
        field: &Field,
    ) -> Result<Extracted, ParseError> {
        let form = request.form(self.body_limit).await?;
        Ok(get_value(form, field.key(), field, false))
    }

    /// Pull a value from the JSON body.
    pub async fn parse_json(
        &self,
        request: &mut ArgsRequest<ReqBody>,
        field: &Field,
    ) -> Result<Extracted, ParseError> {
        Ok(match request.json(self.body_limit).await? {
            Some(document) => get_value(document, field.key(), field, true),
            None => Extracted::Missing,
        })
    }

    /// Pull a value from the headers.
    pub fn parse_headers(&self, request: &ArgsRequest<ReqBody>, field: &Field) -> Extracted {
        get_value(&Headers(&request.parts().headers), field.key(), field, false)
    }

    /// Pull a value from the cookies.
    pub fn parse_cookies(&self, request: &ArgsRequest<ReqBody>, field: &Field) -> Extracted {
        let cookies = crate::cookies::parse(&request.parts().headers);
        get_value(&cookies, field.key(), field, false)
    }

    /// Pull a value from the path-match parameters.
    pub fn parse_match_info(&self, request: &ArgsRequest<ReqBody>, field: &Field) -> Extracted {
        get_value(request.match_info(), field.key(), field, false)
    }

    /// Files are not parsed; upload data can often be read with
    /// [`parse_form`](Self::parse_form) instead.
    pub fn parse_files(
        &self,
        _request: &ArgsRequest<ReqBody>,
        _field: &Field,
    ) -> Result<Extracted, ParseError> {
        Err(ParseError::Unsupported(Location::Files))
    }
}

#[async_trait]
impl<ReqBody> Parser for HttpParser<ReqBody>
where
    ReqBody: HttpBody + Send + Unpin + 'static,
    ReqBody::Data: Send,
    ReqBody::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
{
    type Request = ArgsRequest<ReqBody>;

    fn locations(&self) -> &[Location] {
        &self.locations
    }

    async fn parse_arg(
        &self,
        request: &mut Self::Request,
        location: Location,
        field: &Field,
    ) -> Result<Extracted, ParseError> {
        match location {
            Location::Query => Ok(self.parse_querystring(request, field)),
            Location::Form => self.parse_form(request, field).await,
            Location::Json => self.parse_json(request, field).await,
            Location::Headers => Ok(self.parse_headers(request, field)),
            Location::Cookies => Ok(self.parse_cookies(request, field)),
            Location::MatchInfo => Ok(self.parse_match_info(request, field)),
            Location::Files => self.parse_files(request, field),
        }
    }
}

impl<ReqBody> Default for HttpParser<ReqBody> {
    fn default() -> Self {
        Self::new()
    }
}

impl<ReqBody> Clone for HttpParser<ReqBody> {
    fn clone(&self) -> Self {
        Self {
            locations: self.locations.clone(),
            error_status: self.error_status,
            error_headers: self.error_headers.clone(),
            body_limit: self.body_limit,
            _body: PhantomData,
        }
    }
}

impl<ReqBody> fmt::Debug for HttpParser<ReqBody> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpParser")
            .field("locations", &self.locations)
            .field("error_status", &self.error_status)
            .field("error_headers", &self.error_headers)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}
