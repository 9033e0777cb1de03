//! Tests for the HTTP client module

use super::*;
use crate::error::{Error, ErrorKind};
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(server: &MockServer, path: &str) -> String {
    format!("{}{path}", server.uri())
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(None)
        .header("X-Custom", "value")
        .headers([("X-One", "1"), ("X-Two", "2")])
        .build();

    assert!(config.timeout.is_none());
    assert_eq!(config.default_headers.len(), 3);
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("operationName", "Q")
        .query("variables", "{}")
        .header("X-Request-Id", "abc123");

    assert_eq!(
        config.query,
        vec![
            ("operationName".to_string(), "Q".to_string()),
            ("variables".to_string(), "{}".to_string()),
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
}

#[tokio::test]
async fn test_get_json_sends_headers_and_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graphql"))
        .and(query_param("operationName", "Q"))
        .and(header("X-Default", "d"))
        .and(header("X-Per-Request", "r"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": 42
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder().header("X-Default", "d").build();
    let client = HttpClient::with_config(config).unwrap();

    let request = RequestConfig::new()
        .query("operationName", "Q")
        .header("X-Per-Request", "r");
    let data: serde_json::Value = client
        .get_json_with_config(&url(&mock_server, "/graphql"), request)
        .await
        .unwrap();

    assert_eq!(data["value"], 42);
}

#[tokio::test]
async fn test_request_header_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("X-Token", "fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder().header("X-Token", "stale").build();
    let client = HttpClient::with_config(config).unwrap();

    let _: serde_json::Value = client
        .get_json_with_config(
            &url(&mock_server, "/"),
            RequestConfig::new().header("X-Token", "fresh"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let err = client
        .get_json_with_config::<serde_json::Value>(&url(&mock_server, "/"), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    let err = client
        .get_json_with_config::<serde_json::Value>(&url(&mock_server, "/"), RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Some(Duration::from_millis(100)))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let err = client
        .get_json_with_config::<serde_json::Value>(&url(&mock_server, "/"), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Nothing listens on port 1
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();

    let err = client
        .get_json_with_config::<serde_json::Value>("http://127.0.0.1:1/", RequestConfig::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}
