use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::routing::{get, post};
use http::{HeaderName, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use reqargs_axum::{ArgSchema, Args, ParserLayer};
use reqargs_core::{Field, Location, Schema};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

#[derive(Debug, Deserialize)]
struct UpdateUser {
    id: i64,
    name: String,
    admin: bool,
}

impl ArgSchema for UpdateUser {
    fn schema() -> Schema {
        Schema::new()
            .field(Field::integer("id").location(Location::MatchInfo).required())
            .field(Field::string("name").required())
            .field(Field::boolean("admin").default(json!(false)))
    }
}

#[derive(Debug, Deserialize)]
struct Search {
    q: String,
    page: Option<i64>,
}

impl ArgSchema for Search {
    fn schema() -> Schema {
        Schema::new()
            .field(Field::string("q").required())
            .field(Field::integer("page"))
    }
}

/// Schema whose loaded `page` is an integer but the handler wants a string.
#[derive(Debug, Deserialize)]
struct Mismatched {
    #[allow(dead_code)]
    page: String,
}

impl ArgSchema for Mismatched {
    fn schema() -> Schema {
        Schema::new().field(Field::integer("page").required())
    }
}

async fn update(Args(user): Args<UpdateUser>) -> String {
    format!("{}:{}:{}", user.id, user.name, user.admin)
}

async fn search(Args(search): Args<Search>) -> String {
    format!("{}:{:?}", search.q, search.page)
}

async fn mismatched(Args(_): Args<Mismatched>) -> &'static str {
    "unreachable"
}

fn app() -> Router {
    Router::new()
        .route("/users/{id}", post(update))
        .route("/search", get(search))
        .route("/mismatched", get(mismatched))
}

async fn send(app: Router, request: Request) -> (StatusCode, http::HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

fn json_post(uri: &str, body: &str) -> Request {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn get_request(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_path_and_json_arguments() {
    let (status, _, body) = send(app(), json_post("/users/42", r#"{"name": "ferris"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"42:ferris:false");
}

#[tokio::test]
async fn test_query_string_arguments() {
    let (status, _, body) = send(app(), get_request("/search?q=crab&page=3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"crab:Some(3)");

    let (status, _, body) = send(app(), get_request("/search?q=crab")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"crab:None");
}

#[tokio::test]
async fn test_validation_failure_uses_default_status() {
    let (status, headers, body) = send(app(), get_request("/search?page=x")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(headers["content-type"], "application/json");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "page": ["Not a valid integer."],
            "q": ["Missing data for required field."],
        })
    );
}

#[tokio::test]
async fn test_invalid_path_parameter() {
    let (status, _, body) = send(app(), json_post("/users/abc", r#"{"name": "ferris"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"id": ["Not a valid integer."]}));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (status, headers, body) = send(app(), json_post("/users/1", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers["content-type"], "application/json");
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"json": ["Invalid JSON body."]}));
}

#[tokio::test]
async fn test_layer_overrides_status_and_headers() {
    let app = app().layer(
        ParserLayer::default()
            .with_error_status(400)
            .with_error_header(
                HeaderName::from_static("x-error-source"),
                HeaderValue::from_static("arguments"),
            ),
    );
    let (status, headers, _) = send(app, get_request("/search")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers["x-error-source"], "arguments");
}

#[tokio::test]
async fn test_layer_locations() {
    let app = app().layer(ParserLayer::default().with_locations([Location::Headers]));

    let request = Request::builder()
        .uri("/search?q=ignored")
        .header("q", "from-header")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"from-header:None");
}

#[tokio::test]
async fn test_body_limit() {
    let app = app().layer(ParserLayer::default().with_body_limit(8));
    let (status, _, _) = send(app, json_post("/users/1", r#"{"name": "a very long name"}"#)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_type_mismatch_is_bad_request() {
    let (status, _, body) = send(app(), get_request("/mismatched?page=1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().starts_with("arguments do not match"));
}
