//! In-process tests for the application router.

#![allow(clippy::unwrap_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use tower::ServiceExt;

async fn send(method: &str, uri: &str) -> (StatusCode, String, Option<String>) {
    let response = hello_server::app()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap(), content_type)
}

#[tokio::test]
async fn root_says_hello() {
    let (status, body, content_type) = send("GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello, world!");
    assert_eq!(body, hello_server::GREETING);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
}

#[tokio::test]
async fn greeting_has_no_trailing_whitespace() {
    let (_, body, _) = send("GET", "/").await;
    assert_eq!(body.trim_end(), body);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _, _) = send("GET", "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn root_only_accepts_get() {
    let (status, _, _) = send("POST", "/").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let first = send("GET", "/").await;
    let second = send("GET", "/").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn serves_on_a_socket_until_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(hello_server::serve(listener, async move {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
