use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, Response, StatusCode};
use http_body_util::Full;
use serde_json::Value;

use crate::exceptions::ErrorClass;

/// An HTTP error response of a registered [`ErrorClass`].
///
/// The body is a JSON document, usually the validation messages
/// (`{"field": ["message", ...]}`), and the content type is always
/// `application/json`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{} {}", .class.status().as_u16(), .class.reason())]
pub struct HttpError {
    class: &'static ErrorClass,
    headers: HeaderMap,
    body: Bytes,
}

impl HttpError {
    pub(crate) fn new(class: &'static ErrorClass, body: Bytes, mut headers: HeaderMap) -> Self {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { class, headers, body }
    }

    pub fn class(&self) -> &'static ErrorClass {
        self.class
    }

    pub fn status(&self) -> StatusCode {
        self.class.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body back into JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(self.body));
        *response.status_mut() = self.class.status();
        *response.headers_mut() = self.headers;
        response
    }
}
