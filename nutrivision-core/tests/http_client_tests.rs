//! Tests for the chat-completions HTTP client with a mocked endpoint

use nutrivision_core::config::NutriConfig;
use nutrivision_core::http::{ApiClient, ChatExecutor, ClientError, RequestOptions};
use nutrivision_core::protocol::{ChatRequest, ChatResponse, Message};
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{any, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server with a test key
fn client_for(server: &MockServer) -> ApiClient {
    let config = NutriConfig::default()
        .with_base_url(server.uri())
        .with_api_key("test-key");
    ApiClient::new(&config).expect("Failed to create client")
}

const USER_AGENT: &str = concat!("nutrivision/", env!("CARGO_PKG_VERSION"));

/// Helper to create a test chat request
fn test_chat_request() -> ChatRequest {
    ChatRequest::new("test-model", Message::user("Test message"))
        .with_temperature(0.7)
        .with_max_completion_tokens(1024)
}

/// Test successful JSON response
#[tokio::test]
async fn test_success_json_response() {
    let mock_server = MockServer::start().await;
    let options = RequestOptions::new();
    let request_id = options.request_id;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(header("User-Agent", USER_AGENT))
        .and(header("X-Request-ID", request_id.to_string().as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "X"}}]})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.execute_json(&test_chat_request(), options).await;

    let response = result.expect("Expected successful response");
    assert_eq!(response.first_content(), Some("X"));
}

/// The request body follows the chat-completions shape
#[tokio::test]
async fn test_request_body_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{"role": "user", "content": "Test message"}],
            "max_completion_tokens": 1024
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ChatResponse::from_content("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.first_content(), Some("ok"));
}

/// Every non-200 status comes back as an ApiError with the exact status and body
#[test_case(400, "bad payload" ; "bad request")]
#[test_case(401, r#"{"error":{"message":"Invalid API Key"}}"# ; "unauthorized")]
#[test_case(404, "model not found" ; "not found")]
#[test_case(429, "rate limited" ; "rate limited")]
#[test_case(500, "" ; "server error with empty body")]
#[test_case(503, "<html>unavailable</html>" ; "service unavailable")]
#[test_case(201, "created" ; "non-200 success")]
#[tokio::test]
async fn test_non_200_maps_to_api_error(status: u16, body: &str) {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap_err();

    let api_error = err.api_error().expect("Expected ApiError");
    assert_eq!(api_error.status_code, status);
    assert_eq!(api_error.body, body);
}

/// A 200 without `choices` is a malformed response, not a crash
#[tokio::test]
async fn test_missing_choices_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "chatcmpl-1"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap_err();

    match err {
        ClientError::MalformedResponse { message } => {
            assert!(message.contains("Invalid response format"));
        }
        other => panic!("Expected MalformedResponse, got {:?}", other),
    }
}

/// Test deserialization failure with invalid JSON
#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{ invalid json }")
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await;

    assert!(matches!(result, Err(ClientError::MalformedResponse { .. })));
}

/// A missing key fails before any request reaches the endpoint
#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = NutriConfig::default().with_base_url(mock_server.uri());
    let client = ApiClient::new(&config).unwrap();
    let err = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(err.to_string().contains("GROQ_API_KEY"));
    mock_server.verify().await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

/// An invalid request is rejected locally
#[tokio::test]
async fn test_invalid_request_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let request = test_chat_request().with_temperature(3.0);
    let err = client
        .execute_json(&request, RequestOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidRequest(_)));
}

/// Test request timeout
#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(ChatResponse::from_content("late")),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let options = RequestOptions::new().with_timeout(Duration::from_millis(300));
    let result = client.execute_json(&test_chat_request(), options).await;

    match result {
        Err(ClientError::Timeout(timeout)) => assert_eq!(timeout, Duration::from_millis(300)),
        other => panic!("Expected timeout error, got {:?}", other),
    }
}

/// Connection failures surface as transport errors
#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let config = NutriConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_api_key("test-key");
    let client = ApiClient::new(&config).unwrap();

    let result = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await;

    assert!(matches!(result, Err(ClientError::Transport { .. })));
}

/// One failed call means one request: no retries
#[tokio::test]
async fn test_failure_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await;

    assert!(result.is_err());
    mock_server.verify().await;
}

/// Bodies over the 10 MiB limit are refused on every status, never shown raw
#[test_case(200 ; "success status")]
#[test_case(500 ; "error status")]
#[tokio::test]
async fn test_oversized_body_is_malformed(status: u16) {
    let mock_server = MockServer::start().await;
    let body = "x".repeat(11 * 1024 * 1024);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap_err();

    assert!(err.api_error().is_none());
    match err {
        ClientError::MalformedResponse { message } => {
            assert!(message.contains("exceeds maximum 10485760"));
            assert!(message.len() < 1024);
        }
        other => panic!("Expected MalformedResponse, got {:?}", other),
    }
}

/// The limit is inclusive: a body of exactly the limit is read
#[tokio::test]
async fn test_body_at_limit_is_accepted() {
    let mock_server = MockServer::start().await;
    let body = serde_json::to_string(&ChatResponse::from_content("ok")).unwrap();
    let limit = body.len();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let at_limit = client_for(&mock_server).with_max_response_size(limit);
    let response = at_limit
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.first_content(), Some("ok"));

    let below_limit = client_for(&mock_server).with_max_response_size(limit - 1);
    let result = below_limit
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await;
    assert!(matches!(result, Err(ClientError::MalformedResponse { .. })));
}

/// A small error body still comes back verbatim under a tight limit
#[tokio::test]
async fn test_error_body_within_limit_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).with_max_response_size(64);
    let err = client
        .execute_json(&test_chat_request(), RequestOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err.api_error().map(|e| e.body.as_str()), Some("rate limited"));
}
