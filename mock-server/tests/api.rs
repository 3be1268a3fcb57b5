use std::collections::BTreeMap;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::app;
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json(response: axum::response::Response) -> BTreeMap<String, String> {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- plain text ---

#[tokio::test]
async fn index_returns_ok() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"ok");
}

#[tokio::test]
async fn hello_returns_greeting() {
    let resp = app().oneshot(get("/hello")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"Hello, world!");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let resp = app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- echo ---

#[tokio::test]
async fn echo_returns_decoded_form() {
    let resp = app()
        .oneshot(form_request("/echo", "userid=3&city=Edmonton"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let params = body_json(resp).await;
    assert_eq!(params.get("userid").map(String::as_str), Some("3"));
    assert_eq!(params.get("city").map(String::as_str), Some("Edmonton"));
}

#[tokio::test]
async fn echo_accepts_empty_body() {
    let resp = app().oneshot(form_request("/echo", "")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await.is_empty());
}

#[tokio::test]
async fn echo_rejects_missing_content_type() {
    let req = Request::builder()
        .method("POST")
        .uri("/echo")
        .body("a=1".to_string())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn echo_rejects_get() {
    let resp = app().oneshot(get("/echo")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- headers ---

#[tokio::test]
async fn headers_are_reflected_lowercased() {
    let req = Request::builder()
        .uri("/headers")
        .header("Accept-Charset", "UTF-8")
        .header("Connection", "close")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = body_json(resp).await;
    assert_eq!(headers.get("accept-charset").map(String::as_str), Some("UTF-8"));
    assert_eq!(headers.get("connection").map(String::as_str), Some("close"));
}

// --- status ---

#[tokio::test]
async fn status_route_sets_code_and_reason() {
    let resp = app().oneshot(get("/status/418")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(&body_bytes(resp).await[..], b"418 I'm a teapot");
}

#[tokio::test]
async fn status_route_rejects_invalid_code() {
    let resp = app().oneshot(get("/status/42")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app().oneshot(get("/status/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
