// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[test]
fn test_parse_list_envelope() {
    let body = r#"{
        "data": [{"_id": "m1", "title": "Heat", "year": "1995"}, {"_id": "m2", "title": "Ran"}],
        "totalData": 42,
        "message": "Movies retrieved successfully",
        "success": true
    }"#;
    let envelope: Envelope<Vec<Movie>> = parse_response(200, body).unwrap();
    let page = page_from(envelope, 3);

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].year, Some(1995));
    assert_eq!(page.total_count, 42);
    assert_eq!(page.page, 3);
}

#[test]
fn test_empty_catalog_is_an_empty_page() {
    let body = r#"{ "data": [], "message": "No movies found", "success": false }"#;
    let envelope: Envelope<Vec<Movie>> = parse_response(200, body).unwrap();
    let page = page_from(envelope, 1);
    assert!(page.items.is_empty());
    assert_eq!(page.total_count, 0);
}

#[test]
fn test_create_requires_data() {
    let body = r#"{ "data": null, "message": "Invalid request", "success": false }"#;
    let envelope: Envelope<Movie> = parse_response(201, body).unwrap();
    let err = require_data(envelope).unwrap_err();
    assert_eq!(err, ApiError::Decode("Invalid request".into()));
}

#[parameterized(
    with_message = { 404, r#"{"data":null,"message":"Movie not found.","success":false}"#, "Movie not found. (HTTP 404)" },
    html_body = { 502, "<html>Bad Gateway</html>", "Bad gateway (HTTP 502)" },
    empty_body = { 401, "", "Authentication required (HTTP 401)" },
)]
fn test_error_statuses(status: u16, body: &str, expected: &str) {
    let err = parse_response::<Movie>(status, body).unwrap_err();
    assert_eq!(err.to_string(), expected);
    assert_eq!(err.status(), Some(status));
}

#[test]
fn test_malformed_success_body() {
    let err = parse_response::<Movie>(200, "not json").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn test_base_url_trailing_slash() {
    let api = HttpMovieApi::new("http://movies.test/", None).unwrap();
    assert_eq!(api.base_url(), "http://movies.test");
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Port 9 (discard) is closed on test machines.
    let api = HttpMovieApi::new("http://127.0.0.1:9", None).unwrap();
    let err = api.delete("m1".into()).await.unwrap_err();
    assert!(err.is_connectivity(), "{err:?}");
    assert!(!api.check().await);
}

/// Serves one canned HTTP reply per connection and returns the base URL.
async fn serve_status(status_line: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let reply = format!("HTTP/1.1 {status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            let _ = socket.write_all(reply.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_server_without_health_route_is_online() {
    let base = serve_status("404 Not Found").await;
    let api = HttpMovieApi::new(&base, None).unwrap();
    assert!(api.check().await);
}

#[tokio::test]
async fn test_server_error_reply_is_still_reachable() {
    let base = serve_status("503 Service Unavailable").await;
    let api = HttpMovieApi::new(&base, None).unwrap();
    assert!(api.check().await);
}
