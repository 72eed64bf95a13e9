//! Chat-completions wire types
//!
//! These structures follow the OpenAI chat-completions convention that Groq
//! and other hosted providers accept. Only the subset NutriVision sends and
//! reads is modelled; unknown response fields are ignored on deserialization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest sampling temperature accepted by the endpoint
pub const MIN_TEMPERATURE: f32 = 0.0;

/// Highest sampling temperature accepted by the endpoint
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input message
    User,
}

/// Content of a message: plain text or an ordered list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Structured content parts (for multimodal support)
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the content as plain text, if it is plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::Parts(_) => None,
        }
    }

    /// Get the content parts, if the content is multimodal
    pub fn parts(&self) -> Option<&[ContentPart]> {
        match self {
            MessageContent::Text(_) => None,
            MessageContent::Parts(parts) => Some(parts),
        }
    }
}

/// Individual content part for multimodal messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Text content part
    Text { text: String },
    /// Image reference, usually a `data:` URI carrying base64 bytes
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    /// Create an image part pointing at `url`
    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }

    fn is_text(&self) -> bool {
        matches!(self, ContentPart::Text { .. })
    }

    fn is_image(&self) -> bool {
        matches!(self, ContentPart::ImageUrl { .. })
    }
}

/// Image URL wrapper as it appears on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,

    /// Content of the message
    pub content: MessageContent,
}

impl Message {
    /// Create a plain-text user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Create a multimodal user message
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: MessageRole::User,
            content: MessageContent::Parts(parts),
        }
    }

    /// True when the content holds exactly one text part and one image part
    pub fn is_single_image_prompt(&self) -> bool {
        match self.content.parts() {
            Some(parts) => {
                parts.iter().filter(|p| p.is_text()).count() == 1
                    && parts.iter().filter(|p| p.is_image()).count() == 1
            }
            None => false,
        }
    }
}

/// Chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier to use
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0 to 2.0)
    pub temperature: f32,

    /// Upper bound on generated tokens
    pub max_completion_tokens: u32,
}

impl ChatRequest {
    /// Create a request for `model` with a single message and neutral sampling
    pub fn new(model: impl Into<String>, message: Message) -> Self {
        Self {
            model: model.into(),
            messages: vec![message],
            temperature: 1.0,
            max_completion_tokens: 1024,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the completion token bound
    pub fn with_max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = max_completion_tokens;
        self
    }

    /// Check the request invariants before it is sent
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.model.trim().is_empty() {
            return Err(RequestError::MissingModel);
        }
        if self.messages.is_empty() {
            return Err(RequestError::NoMessages);
        }
        if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(RequestError::TemperatureOutOfRange(self.temperature));
        }
        if self.max_completion_tokens == 0 {
            return Err(RequestError::ZeroTokenBound);
        }
        Ok(())
    }
}

/// Violations of the request invariants
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("model identifier is empty")]
    MissingModel,

    #[error("request has no messages")]
    NoMessages,

    #[error("temperature {0} is outside [0, 2]")]
    TemperatureOutOfRange(f32),

    #[error("max_completion_tokens must be positive")]
    ZeroTokenBound,
}

/// Chat completion response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response identifier, when the provider sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Model that produced the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Candidate completions
    pub choices: Vec<ResponseChoice>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<CompletionUsage>,
}

impl ChatResponse {
    /// Build a response holding a single choice with `content`
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            id: None,
            model: None,
            choices: vec![ResponseChoice {
                message: ResponseMessage {
                    content: content.into(),
                },
            }],
            usage: None,
        }
    }

    /// Text of the first choice, the only part NutriVision displays
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// One candidate completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseChoice {
    pub message: ResponseMessage,
}

/// Message inside a candidate completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub content: String,
}

/// Token usage information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}
