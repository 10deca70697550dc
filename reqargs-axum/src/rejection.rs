use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use reqargs_core::ParseError;
use reqargs_http::{BodyError, HttpError};
use thiserror::Error;
use tracing::error;

/// Rejection of the [`Args`](crate::Args) extractor.
#[derive(Debug, Error)]
pub enum ArgsRejection {
    /// Arguments failed validation; the response is already translated.
    #[error(transparent)]
    Invalid(HttpError),

    /// The request could not be parsed at all.
    #[error(transparent)]
    Parse(ParseError),

    /// Parsed arguments do not deserialize into the handler's type.
    #[error("arguments do not match the handler type: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl ArgsRejection {
    /// Status of the response this rejection turns into.
    pub fn status(&self) -> StatusCode {
        match self {
            ArgsRejection::Invalid(error) => error.status(),
            ArgsRejection::Parse(ParseError::Body(source)) => {
                match source.downcast_ref::<BodyError>() {
                    Some(BodyError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
                    _ => StatusCode::BAD_REQUEST,
                }
            }
            ArgsRejection::Parse(ParseError::InvalidJson(_)) => StatusCode::BAD_REQUEST,
            ArgsRejection::Parse(ParseError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ArgsRejection::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ArgsRejection::Deserialize(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ArgsRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ArgsRejection::Invalid(error) => error.into_response().map(Body::new),
            rejection => {
                if status.is_server_error() {
                    error!(error = %rejection, "argument parsing failed");
                }
                (status, rejection.to_string()).into_response()
            }
        }
    }
}
