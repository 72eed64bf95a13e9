//! Protocol module for chat-completions request/response structures
//!
//! This module defines the values exchanged with the hosted model endpoint.
//! Every value here is built per call and dropped once the result is shown.

pub mod types;

pub use types::{
    ChatRequest, ChatResponse, CompletionUsage, ContentPart, ImageUrl, Message, MessageContent,
    MessageRole, RequestError, ResponseChoice, ResponseMessage, MAX_TEMPERATURE, MIN_TEMPERATURE,
};
