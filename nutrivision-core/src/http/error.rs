//! HTTP error types and mapping utilities

use crate::config::ConfigError;
use crate::protocol::RequestError;
use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Result type for chat-completion calls
pub type ClientResult<T> = Result<T, ClientError>;

/// A non-200 answer from the endpoint
///
/// Carries the status and the raw body exactly as received. There is no
/// retry metadata: an `ApiError` is terminal for the action that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status_code: u16,
    pub body: String,
}

impl ApiError {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// Message from an OpenAI-style error envelope, if the body carries one
    pub fn provider_message(&self) -> Option<String> {
        let json: Value = serde_json::from_str(&self.body).ok()?;

        // OpenAI/Groq format: { "error": { "message": "...", "type": "..." } }
        if let Some(message) = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
        {
            return Some(message.to_string());
        }

        // Generic format: { "message": "..." } or { "error": "..." }
        json.get("message")
            .and_then(Value::as_str)
            .or_else(|| json.get("error").and_then(Value::as_str))
            .map(str::to_string)
    }

    /// Short classification of the status, for logs
    pub fn kind(&self) -> &'static str {
        match StatusCode::from_u16(self.status_code) {
            Ok(StatusCode::UNAUTHORIZED) | Ok(StatusCode::FORBIDDEN) => "authentication",
            Ok(StatusCode::TOO_MANY_REQUESTS) => "rate_limit",
            Ok(StatusCode::NOT_FOUND) => "model_not_found",
            Ok(status) if status.is_client_error() => "invalid_request",
            Ok(status) if status.is_server_error() => "server_error",
            _ => "unexpected_status",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error from API: {}\n{}", self.status_code, self.body)
    }
}

impl std::error::Error for ApiError {}

/// Everything that can go wrong with a single chat-completion call
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API key is not configured; no network attempt was made
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The request violates the chat request invariants
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The request body could not be encoded
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// Connection, DNS or I/O failure reaching the endpoint
    #[error("Network error: {message}")]
    Transport { message: String },

    /// The endpoint did not answer within the configured timeout
    #[error("Request timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// The endpoint answered with a non-200 status
    #[error("{0}")]
    Api(ApiError),

    /// A 200 answer that does not carry a usable first choice
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl ClientError {
    /// True when the call failed before any network attempt
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::Configuration(_))
    }

    /// The API error, when the endpoint answered with a non-200 status
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(err: ApiError) -> Self {
        ClientError::Api(err)
    }
}

/// Map a reqwest send/read failure to a `ClientError`
pub fn map_transport_error(err: reqwest::Error, timeout: Duration, request_id: Uuid) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout)
    } else if err.is_connect() {
        ClientError::Transport {
            message: format!("Connection failed: {} [request_id: {}]", err, request_id),
        }
    } else {
        ClientError::Transport {
            message: format!("{} [request_id: {}]", err, request_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_keeps_status_and_body() {
        let err = ApiError::new(429, "rate limited");
        let text = err.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }

    #[test]
    fn test_provider_message_openai_format() {
        let err = ApiError::new(
            401,
            r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        );
        assert_eq!(err.provider_message().as_deref(), Some("Invalid API Key"));
        assert_eq!(err.kind(), "authentication");
    }

    #[test]
    fn test_provider_message_generic_formats() {
        assert_eq!(
            ApiError::new(500, r#"{"message":"boom"}"#).provider_message().as_deref(),
            Some("boom")
        );
        assert_eq!(
            ApiError::new(400, r#"{"error":"bad"}"#).provider_message().as_deref(),
            Some("bad")
        );
        assert_eq!(ApiError::new(502, "<html>").provider_message(), None);
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(ApiError::new(429, "").kind(), "rate_limit");
        assert_eq!(ApiError::new(404, "").kind(), "model_not_found");
        assert_eq!(ApiError::new(413, "").kind(), "invalid_request");
        assert_eq!(ApiError::new(503, "").kind(), "server_error");
        assert_eq!(ApiError::new(302, "").kind(), "unexpected_status");
    }

    #[test]
    fn test_timeout_message() {
        let err = ClientError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }
}
