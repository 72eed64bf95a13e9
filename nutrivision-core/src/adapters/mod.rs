//! Adapters between user input and the chat-completions endpoint
//!
//! Each adapter builds one request, hands it to a [`ChatExecutor`], and turns
//! the outcome into text for display. Errors stop here: callers always get a
//! [`Reply`], never a propagated fault.
//!
//! [`ChatExecutor`]: crate::http::ChatExecutor

mod image;
mod plan;
pub mod prompts;

pub use image::ImageAnalysisAdapter;
pub use plan::TextPlanAdapter;

use crate::config::API_KEY_VAR;
use crate::http::{ClientError, ClientResult};
use crate::protocol::ChatResponse;

/// Sampling temperature used by both adapters
pub const TEMPERATURE: f32 = 0.7;

/// Completion token bound used by both adapters
pub const MAX_COMPLETION_TOKENS: u32 = 1024;

/// Displayable result of one user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The model's answer, verbatim
    Answer(String),
    /// A message describing why the action failed
    Failure(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) | Reply::Failure(text) => text,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Reply::Answer(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Reply::Answer(text) | Reply::Failure(text) => text,
        }
    }

    pub(crate) fn from_result(result: ClientResult<String>, fallback: &str) -> Self {
        match result {
            Ok(text) => Reply::Answer(text),
            Err(err) => Reply::Failure(failure_message(&err, fallback)),
        }
    }
}

/// Message shown when the API key is not configured
pub fn missing_key_message() -> String {
    format!(
        "API key is missing. Please set the {} in your .env file.",
        API_KEY_VAR
    )
}

/// Convert a failed call into the message shown to the user
///
/// API errors keep the status code and raw body so the failure can be
/// diagnosed; `fallback` is the action-specific apology.
pub fn failure_message(err: &ClientError, fallback: &str) -> String {
    match err {
        ClientError::Configuration(_) => missing_key_message(),
        ClientError::Api(api_error) => format!("{}\n{}", api_error, fallback),
        other => format!("Oops! Something went wrong: {}", other),
    }
}

/// Take the text of the first choice
pub(crate) fn extract_content(response: ChatResponse) -> ClientResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ClientError::MalformedResponse {
            message: "response contained no choices".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::http::ApiError;
    use std::time::Duration;

    #[test]
    fn test_api_failure_message_has_status_and_body() {
        let err = ClientError::Api(ApiError::new(429, "rate limited"));
        let message = failure_message(&err, "Sorry.");
        assert!(message.contains("429"));
        assert!(message.contains("rate limited"));
        assert!(message.ends_with("Sorry."));
    }

    #[test]
    fn test_configuration_failure_message() {
        let err = ClientError::Configuration(ConfigError::MissingApiKey {
            var: API_KEY_VAR.to_string(),
        });
        assert_eq!(failure_message(&err, "Sorry."), missing_key_message());
    }

    #[test]
    fn test_transport_failure_message_is_generic() {
        let err = ClientError::Timeout(Duration::from_secs(30));
        assert_eq!(
            failure_message(&err, "Sorry."),
            "Oops! Something went wrong: Request timed out after 30 seconds"
        );
    }

    #[test]
    fn test_extract_content_requires_a_choice() {
        let empty = ChatResponse {
            id: None,
            model: None,
            choices: Vec::new(),
            usage: None,
        };
        assert!(matches!(
            extract_content(empty),
            Err(ClientError::MalformedResponse { .. })
        ));
        assert_eq!(extract_content(ChatResponse::from_content("X")).unwrap(), "X");
    }

    #[test]
    fn test_reply_accessors() {
        let reply = Reply::Answer("ok".to_string());
        assert!(reply.is_answer());
        assert_eq!(reply.text(), "ok");
        assert_eq!(Reply::Failure("no".to_string()).into_text(), "no");
    }
}
