use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::{BodyExt, Empty};
use pretty_assertions::assert_eq;
use reqargs_core::{ParseError, ValidationError};
use reqargs_http::exceptions::error_classes;
use reqargs_http::{ConfigError, ErrorFamily, HttpParser, ParserConfig};
use serde_json::json;

type Parser = HttpParser<Empty<Bytes>>;

fn error() -> ValidationError {
    ValidationError::single("name", "Missing data for required field.")
}

#[test]
fn test_default_status_and_body() {
    let response = Parser::new().handle_error(&error(), None, None).unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(
        response.json().unwrap(),
        json!({"name": ["Missing data for required field."]})
    );
    assert_eq!(response.to_string(), "422 Unprocessable Entity");
}

#[test]
fn test_status_requested_by_error() {
    let response = Parser::new()
        .handle_error(&error().with_status(409), None, None)
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(response.class().family(), ErrorFamily::ClientError);
}

#[test]
fn test_explicit_status_wins() {
    let parser = Parser::new().with_error_status(400);
    let response = parser
        .handle_error(&error().with_status(409), Some(403), None)
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = parser.handle_error(&error(), None, None).unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_header_precedence() {
    let parser = Parser::new()
        .with_error_header(
            HeaderName::from_static("x-source"),
            HeaderValue::from_static("parser"),
        )
        .with_error_header(
            HeaderName::from_static("x-parser-only"),
            HeaderValue::from_static("yes"),
        );
    let error = error()
        .with_header("x-source", "error")
        .with_header("x-error-only", "yes");

    let response = parser.handle_error(&error, None, None).unwrap();
    assert_eq!(response.headers()["x-source"], "error");
    assert_eq!(response.headers()["x-parser-only"], "yes");
    assert_eq!(response.headers()["x-error-only"], "yes");

    let mut explicit = HeaderMap::new();
    explicit.insert("x-source", HeaderValue::from_static("call"));
    let response = parser.handle_error(&error, None, Some(&explicit)).unwrap();
    assert_eq!(response.headers()["x-source"], "call");
    assert_eq!(response.headers()["x-parser-only"], "yes");
}

#[test]
fn test_content_type_cannot_be_overridden() {
    let error = error().with_header("content-type", "text/plain");
    let response = Parser::new().handle_error(&error, None, None).unwrap();
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
}

#[test]
fn test_invalid_error_header_is_dropped() {
    let error = error().with_header("bad header", "x");
    let response = Parser::new().handle_error(&error, None, None).unwrap();
    assert_eq!(response.headers().len(), 1);
}

#[test]
fn test_unregistered_status() {
    let parser = Parser::new();

    let result = parser.handle_error(&error(), Some(299), None);
    assert!(matches!(result, Err(ParseError::UnregisteredStatus(299))));

    let result = parser.handle_error(&error().with_status(799), None, None);
    assert!(matches!(result, Err(ParseError::UnregisteredStatus(799))));
}

#[test]
fn test_every_class_builds_its_own_status() {
    let parser = Parser::new();
    for class in error_classes() {
        let code = class.status().as_u16();
        let response = parser.handle_error(&error(), Some(code), None).unwrap();
        assert_eq!(response.status(), class.status());
        assert_eq!(response.class().reason(), class.reason());
    }
}

#[tokio::test]
async fn test_into_response() {
    let response = Parser::new()
        .handle_error(&error().with_header("x-request-id", "7"), Some(400), None)
        .unwrap()
        .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["x-request-id"], "7");
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"name": ["Missing data for required field."]}));
}

mod config {
    use super::{ConfigError, Parser, ParserConfig, StatusCode, error};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_config() {
        let config = ParserConfig::from_yaml(
            r#"
locations: [headers]
error_status: 400
error_headers:
  x-error-source: arguments
body_limit: 16
"#,
        )
        .unwrap();
        let parser = Parser::from_config(&config).unwrap();

        assert_eq!(parser.error_status(), 400);
        assert_eq!(parser.body_limit(), Some(16));

        let response = parser.handle_error(&error(), None, None).unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["x-error-source"], "arguments");
    }

    #[test]
    fn test_from_config_rejects_unregistered_status() {
        let config = ParserConfig {
            error_status: 299,
            ..Default::default()
        };
        assert!(matches!(
            Parser::from_config(&config),
            Err(ConfigError::UnregisteredStatus(299))
        ));
    }

    #[test]
    fn test_from_config_rejects_bad_header_value() {
        let mut config = ParserConfig::default();
        config
            .error_headers
            .insert("x-error".to_owned(), "line\nbreak".to_owned());
        assert!(matches!(
            Parser::from_config(&config),
            Err(ConfigError::InvalidHeaderValue { .. })
        ));
    }
}
