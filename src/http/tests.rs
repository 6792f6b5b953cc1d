//! Tests for the HTTP client module

use super::client::{error_message, is_idempotent, is_retryable_status};
use super::*;
use crate::auth::Authenticator;
use crate::error::Error;
use crate::types::BackoffType;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url, "https://3.basecampapi.com");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.user_agent, "Basecamp CLI (basecamp-cli/0.1.0)");
    assert_eq!(
        config.default_headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::default()));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("q", "roadmap")
        .query_opt("page", Some(2))
        .query_opt::<u64>("bucket_id", None)
        .header("X-Request-Id", "abc123")
        .json(serde_json::json!({"key": "value"}))
        .timeout(Duration::from_secs(10))
        .retries(2);

    assert_eq!(
        config.query,
        vec![
            ("q".to_string(), "roadmap".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(config.body.is_some());
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.max_retries, Some(2));
}

#[test]
fn test_path_and_query() {
    assert_eq!(
        path_and_query("https://3.basecampapi.com/999/projects.json?page=2").unwrap(),
        "/999/projects.json?page=2"
    );
    assert_eq!(
        path_and_query("https://3.basecampapi.com/999/people.json").unwrap(),
        "/999/people.json"
    );
    assert!(path_and_query("not a url").is_err());
}

#[test_case(r#"{"error": "Not authorized"}"#, "Not authorized" ; "error field")]
#[test_case(r#"{"message": "Bad thing"}"#, "Bad thing" ; "message field")]
#[test_case(r#"{"error": "", "message": "Second choice"}"#, "Second choice" ; "empty error skipped")]
#[test_case(r#"{"errors": ["name is blank"]}"#, r#"["name is blank"]"# ; "errors list")]
#[test_case(r#"{"other": 1}"#, "Unprocessable Entity" ; "no known field")]
#[test_case("<html>oops</html>", "Unprocessable Entity: <html>oops</html>" ; "non json body")]
#[test_case("", "Unprocessable Entity" ; "empty body")]
fn test_error_message(body: &str, expected: &str) {
    assert_eq!(error_message(StatusCode::UNPROCESSABLE_ENTITY, body), expected);
}

#[test]
fn test_error_message_truncates_text() {
    let body = "x".repeat(500);
    let message = error_message(StatusCode::BAD_GATEWAY, &body);
    assert_eq!(message, format!("Bad Gateway: {}", "x".repeat(200)));
}

#[tokio::test]
async fn test_http_client_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/projects.json"))
        .and(header("Content-Type", "application/json"))
        .and(header("User-Agent", "Basecamp CLI (basecamp-cli/0.1.0)"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", r#"<https://3.basecampapi.com/999/projects.json?page=2>; rel="next""#)
                .set_body_json(serde_json::json!([{"id": 1, "name": "Alpha"}])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .get("/999/projects.json", RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.body[0]["name"], "Alpha");
    assert!(response.headers.get("link").is_some());
}

#[tokio::test]
async fn test_http_client_bearer_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/my/profile.json"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 7})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .no_rate_limit()
        .build();
    let client = HttpClient::with_auth(config, Authenticator::bearer("secret-token")).unwrap();

    let response = client
        .get("/999/my/profile.json", RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.body["id"], 7);
}

#[tokio::test]
async fn test_http_client_post_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/999/projects.json"))
        .and(body_json(serde_json::json!({"name": "New"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": 123,
            "name": "New"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .post("/999/projects.json", serde_json::json!({"name": "New"}))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert_eq!(response.body["id"], 123);
}

#[tokio::test]
async fn test_http_client_no_content_is_empty_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/999/projects/1.json"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/999/buckets/1/recordings/2/status/trashed.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    let deleted = client.delete("/999/projects/1.json").await.unwrap();
    assert_eq!(deleted.status, 204);
    assert_eq!(deleted.body, serde_json::json!({}));

    let trashed = client
        .put("/999/buckets/1/recordings/2/status/trashed.json", None)
        .await
        .unwrap();
    assert_eq!(trashed.body, serde_json::json!({}));
}

#[tokio::test]
async fn test_http_client_query_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/search.json"))
        .and(query_param("q", "roadmap"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .get(
            "/999/search.json",
            RequestConfig::new().query("q", "roadmap").query("page", "2"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_full_url_is_rerooted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/projects.json"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"id": 2}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);

    // Link headers point at the production host; only path and query are kept
    let response = client
        .get(
            "https://3.basecampapi.com/999/projects.json?page=2",
            RequestConfig::new(),
        )
        .await
        .unwrap();
    assert_eq!(response.body[0]["id"], 2);
}

#[tokio::test]
async fn test_http_client_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/projects/404.json"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "Not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .get("/999/projects/404.json", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API request failed (404): Not found");
}

#[tokio::test]
async fn test_http_client_retry_on_500() {
    let mock_server = MockServer::start().await;

    // First two calls return 500, third succeeds
    Mock::given(method("GET"))
        .and(path("/999/people.json"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/999/people.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .get("/999/people.json", RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/people.json"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "0")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/999/people.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .get("/999/people.json", RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_rate_limited_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/people.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .get("/999/people.json", RequestConfig::new().retries(1))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 0
        }
    ));
}

#[tokio::test]
async fn test_http_client_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/always-fail.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .get("/999/always-fail.json", RequestConfig::new().retries(2))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 500, .. }));
    assert!(err.to_string().contains("Server error"));
}

#[tokio::test]
async fn test_http_client_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/999/projects.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .get("/999/projects.json", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_http_client_post_not_retried_on_502() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/999/projects.json"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/999/projects.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client
        .post("/999/projects.json", serde_json::json!({"name": "Once"}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 502, .. }));
}

#[tokio::test]
async fn test_http_client_post_retried_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/999/projects.json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/999/projects.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .post("/999/projects.json", serde_json::json!({"name": "Once"}))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_http_client_put_retried_on_503() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/999/projects/1.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/999/projects/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let response = client
        .put("/999/projects/1.json", Some(serde_json::json!({"name": "Again"})))
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[test_case(Method::GET, true)]
#[test_case(Method::PUT, true)]
#[test_case(Method::DELETE, true)]
#[test_case(Method::POST, false)]
#[test_case(Method::PATCH, false)]
fn test_is_idempotent(method: Method, expected: bool) {
    assert_eq!(is_idempotent(&method), expected);
}

#[test_case(429, true)]
#[test_case(500, true)]
#[test_case(502, true)]
#[test_case(503, true)]
#[test_case(504, true)]
#[test_case(400, false)]
#[test_case(404, false)]
#[test_case(501, false)]
fn test_is_retryable_status(status: u16, expected: bool) {
    assert_eq!(is_retryable_status(status), expected);
}

#[test]
fn test_calculate_backoff_constant() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(100),
            Duration::from_secs(10),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(5), Duration::from_millis(100));
}

#[test]
fn test_calculate_backoff_exponential_capped() {
    let config = HttpClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .no_rate_limit()
        .build();

    let client = HttpClient::with_config(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
}

#[test]
fn test_has_rate_limiter() {
    let client = HttpClient::new().unwrap();
    assert!(client.has_rate_limiter());
}
