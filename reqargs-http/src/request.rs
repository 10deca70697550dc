use actix_router::ResourceDef;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request, request::Parts};
use hyper::body::Body as HttpBody;
use reqargs_core::{MultiDict, ParseError, is_json};
use serde_json::Value;
use tracing::debug;

use crate::body::{BodyError, BufferedBody};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM: &str = "multipart/form-data";

enum FormEncoding {
    Urlencoded,
    /// Full content type, boundary included.
    Multipart(String),
}

/// An HTTP request being parsed for arguments.
///
/// Holds the per-request memo: the body is read at most once, and the
/// decoded form and JSON document are kept for every later field lookup.
/// When parsing is done, [`into_request`](Self::into_request) gives the
/// request back with the body intact.
#[derive(Debug)]
pub struct ArgsRequest<ReqBody>
where
    ReqBody: HttpBody,
{
    parts: Parts,
    body: BufferedBody<ReqBody>,
    match_info: MultiDict,
    form: Option<MultiDict>,
    json: Option<Value>,
}

impl<ReqBody> ArgsRequest<ReqBody>
where
    ReqBody: HttpBody,
{
    pub fn from_request(request: Request<ReqBody>) -> Self {
        let (parts, body) = request.into_parts();
        Self::from_parts(parts, BufferedBody::Passthrough(body))
    }

    pub fn from_buffered(request: Request<BufferedBody<ReqBody>>) -> Self {
        let (parts, body) = request.into_parts();
        Self::from_parts(parts, body)
    }

    fn from_parts(parts: Parts, body: BufferedBody<ReqBody>) -> Self {
        Self {
            parts,
            body,
            match_info: MultiDict::new(),
            form: None,
            json: None,
        }
    }

    pub fn into_request(self) -> Request<BufferedBody<ReqBody>> {
        Request::from_parts(self.parts, self.body)
    }

    pub fn parts(&self) -> &Parts {
        &self.parts
    }

    /// Sets the path-match parameters, usually taken from the router.
    pub fn with_match_info(mut self, match_info: MultiDict) -> Self {
        self.match_info = match_info;
        self
    }

    pub fn set_match_info(&mut self, match_info: MultiDict) {
        self.match_info = match_info;
    }

    /// Captures path-match parameters by matching the request path against
    /// a route pattern such as `/users/{id}`.
    ///
    /// Returns `false` and leaves the match info untouched when the path
    /// does not match.
    pub fn match_route(&mut self, resource: &ResourceDef) -> bool {
        let mut path = actix_router::Path::new(self.parts.uri.path());
        if !resource.capture_match_info(&mut path) {
            return false;
        }
        self.match_info = path
            .iter()
            .map(|(key, value)| (key.to_owned(), value.to_owned()))
            .collect();
        true
    }

    pub fn match_info(&self) -> &MultiDict {
        &self.match_info
    }

    /// Media type of the body without parameters, if the header is valid.
    ///
    /// The case is kept as sent; media types compare case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim())
    }

    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(is_json)
    }

    fn form_encoding(&self) -> Option<FormEncoding> {
        let Some(header) = self.parts.headers.get(CONTENT_TYPE) else {
            return Some(FormEncoding::Urlencoded);
        };
        let header = header.to_str().ok()?;
        let essence = header.split(';').next().unwrap_or_default().trim();
        if essence.is_empty() || essence.eq_ignore_ascii_case(FORM_URLENCODED) {
            Some(FormEncoding::Urlencoded)
        } else if essence.eq_ignore_ascii_case(MULTIPART_FORM) {
            Some(FormEncoding::Multipart(header.to_owned()))
        } else {
            None
        }
    }

    /// Returns `true` if the request carries a non-empty body.
    pub fn body_exists(&self) -> bool {
        !self.body.is_end_stream()
    }
}

impl<ReqBody> ArgsRequest<ReqBody>
where
    ReqBody: HttpBody + Send + Unpin,
    ReqBody::Data: Send,
    ReqBody::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    /// Reads the whole body, once. Later calls return the buffered bytes.
    ///
    /// A failed read keeps what was received in the body, so
    /// [`into_request`](Self::into_request) still hands back every byte.
    pub async fn read_body(&mut self, limit: Option<usize>) -> Result<Bytes, BodyError> {
        if let Some(bytes) = self.body.buffered() {
            return Ok(bytes);
        }
        let body = std::mem::replace(&mut self.body, BufferedBody::Complete(None));
        match body.collect_limited(limit).await {
            Ok(bytes) => {
                debug!(len = bytes.len(), "request body buffered");
                #[cfg(feature = "metrics")]
                crate::metrics::record_body_read(bytes.len());
                self.body = BufferedBody::Complete(Some(bytes.clone()));
                Ok(bytes)
            }
            Err((body, error)) => {
                debug!(%error, "request body read stopped early");
                self.body = body;
                Err(error)
            }
        }
    }

    /// The form body, decoded once.
    ///
    /// Urlencoded bodies and the text fields of multipart bodies are
    /// decoded; multipart file parts are skipped. Requests whose method does
    /// not carry form data, and bodies of any other content type, produce
    /// an empty form. An absent content type is treated as urlencoded.
    pub async fn form(&mut self, limit: Option<usize>) -> Result<&MultiDict, ParseError> {
        if self.form.is_none() {
            let form = self.decode_form(limit).await.map_err(body_error)?;
            self.form = Some(form);
        }
        Ok(self.form.get_or_insert_with(MultiDict::new))
    }

    async fn decode_form(&mut self, limit: Option<usize>) -> Result<MultiDict, BodyError> {
        if !matches!(
            self.parts.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE | Method::TRACE
        ) {
            return Ok(MultiDict::new());
        }
        let Some(encoding) = self.form_encoding() else {
            return Ok(MultiDict::new());
        };
        let bytes = self.read_body(limit).await?;
        match encoding {
            FormEncoding::Urlencoded => Ok(crate::query::parse_bytes(&bytes)?),
            FormEncoding::Multipart(content_type) => {
                crate::multipart::parse(&content_type, bytes).await
            }
        }
    }

    /// The JSON document, decoded once.
    ///
    /// `None` when the request has no body, its content type is not JSON,
    /// or the body is empty. A non-empty body that is not valid JSON is an
    /// error.
    pub async fn json(&mut self, limit: Option<usize>) -> Result<Option<&Value>, ParseError> {
        if self.json.is_none() {
            if !(self.body_exists() && self.is_json()) {
                return Ok(None);
            }
            let bytes = self.read_body(limit).await.map_err(body_error)?;
            if bytes.is_empty() {
                return Ok(None);
            }
            let document = serde_json::from_slice(&bytes)?;
            self.json = Some(document);
        }
        Ok(self.json.as_ref())
    }
}

fn body_error(error: BodyError) -> ParseError {
    ParseError::Body(Box::new(error))
}
