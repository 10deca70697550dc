use axum::extract::{FromRequest, FromRequestParts, RawPathParams, Request};
use lazy_static::lazy_static;
use reqargs_core::{MultiDict, ParseError, Parser, Schema, ValidationError};
use reqargs_http::ArgsRequest;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{ArgsRejection, AxumParser};

lazy_static! {
    static ref DEFAULT_PARSER: AxumParser = AxumParser::new();
}

const INVALID_JSON_STATUS: u16 = 400;

/// A type whose fields are declared as a [`Schema`].
///
/// The loaded arguments are deserialized into the implementing type, so the
/// schema's field names must match what its `Deserialize` impl expects.
pub trait ArgSchema: DeserializeOwned {
    /// Fields to parse for this type.
    fn schema() -> Schema;
}

/// Extractor for parsed and validated request arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Args<T>(pub T);

impl<T> Args<T> {
    /// Consumes the extractor, returning the arguments.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Args<T>
where
    T: ArgSchema + Send,
    S: Send + Sync,
{
    type Rejection = ArgsRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let parser = parts
            .extensions
            .get::<AxumParser>()
            .cloned()
            .unwrap_or_else(|| DEFAULT_PARSER.clone());
        let match_info: MultiDict = match RawPathParams::from_request_parts(&mut parts, state).await
        {
            Ok(params) => params.iter().collect(),
            Err(_) => MultiDict::new(),
        };

        let mut request = ArgsRequest::from_request(Request::from_parts(parts, body))
            .with_match_info(match_info);
        let args = parser
            .parse(&T::schema(), &mut request)
            .await
            .map_err(|error| reject(&parser, error))?;

        serde_json::from_value(Value::Object(args))
            .map(Args)
            .map_err(ArgsRejection::Deserialize)
    }
}

fn reject(parser: &AxumParser, error: ParseError) -> ArgsRejection {
    let translated = match error {
        ParseError::Validation(error) => parser.handle_error(&error, None, None),
        ParseError::InvalidJson(source) => {
            debug!(error = %source, "invalid JSON body");
            let error = ValidationError::single("json", "Invalid JSON body.");
            parser.handle_error(&error, Some(INVALID_JSON_STATUS), None)
        }
        error => Err(error),
    };
    match translated {
        Ok(response) => ArgsRejection::Invalid(response),
        Err(error) => ArgsRejection::Parse(error),
    }
}

