//! Integration tests for the HTTP client.

use std::time::Duration;

use serde::Deserialize;
use svgstorm_net::NetworkError;
use svgstorm_net::http::{HttpClient, HttpClientConfig};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq)]
struct Payload {
    name: String,
    size: u32,
}

fn client() -> HttpClient {
    HttpClient::new(HttpClientConfig::default()).expect("Failed to build client")
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).expect("valid url")
}

#[test]
fn test_default_config() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.max_redirects, 10);
    assert!(config.user_agent.starts_with("svgstorm/"));
}

#[tokio::test]
async fn test_get_asks_for_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/icon"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "svgstorm-tests"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "sun", "size": 24})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpClientConfig {
        user_agent: "svgstorm-tests".into(),
        ..HttpClientConfig::default()
    })
    .expect("Failed to build client");

    let response = client.get(url(&server, "/icon")).await.expect("request failed");
    assert!(response.is_success());
    assert_eq!(response.status(), 200);

    let payload: Payload = response.json().await.expect("invalid json");
    assert_eq!(
        payload,
        Payload {
            name: "sun".into(),
            size: 24
        }
    );
}

#[tokio::test]
async fn test_error_for_status_reads_json_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/icons/comet"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"success": false, "message": "Icon not found"})),
        )
        .mount(&server)
        .await;

    let response = client()
        .get(url(&server, "/api/icons/comet"))
        .await
        .expect("request failed");
    assert!(!response.is_retryable());

    let err = response.error_for_status().await.unwrap_err();
    assert_eq!(
        err,
        NetworkError::HttpStatus {
            status: 404,
            message: Some("Icon not found".into())
        }
    );
    assert_eq!(err.to_string(), "HTTP 404: Icon not found");
}

#[tokio::test]
async fn test_error_for_status_ignores_other_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let response = client().get(url(&server, "/")).await.expect("request failed");
    assert!(response.is_retryable());

    let err = response.error_for_status().await.unwrap_err();
    assert_eq!(
        err,
        NetworkError::HttpStatus {
            status: 502,
            message: None
        }
    );
}

#[tokio::test]
async fn test_retry_after_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let response = client().get(url(&server, "/")).await.expect("request failed");
    assert!(response.is_retryable());
    assert_eq!(response.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn test_malformed_json_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let response = client().get(url(&server, "/")).await.expect("request failed");
    let result: Result<Payload, _> = response.json().await;
    assert!(matches!(result, Err(NetworkError::Json(_))));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = HttpClient::new(HttpClientConfig {
        timeout: Duration::from_millis(50),
        ..HttpClientConfig::default()
    })
    .expect("Failed to build client");

    let result = client.get(url(&server, "/")).await;
    assert_eq!(result.unwrap_err(), NetworkError::Timeout);
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let result = client()
        .get(Url::parse("http://127.0.0.1:9/").expect("valid url"))
        .await;
    let err = result.unwrap_err();
    assert!(matches!(err, NetworkError::Connection(_)), "{err:?}");
    assert!(err.is_transient());
}
