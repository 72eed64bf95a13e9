//! HTTP client module for calling the chat-completions endpoint
//!
//! This module implements the HTTP layer, handling:
//! - Bearer authentication with the configured API key
//! - Request/response serialization
//! - Status and transport error mapping (no retries)
//! - Request ID generation and correlation

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ClientError, ClientResult};

use crate::protocol::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

/// Path of the chat-completions call, relative to the base URL
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Options for an HTTP request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Unique request ID for correlation
    pub request_id: Uuid,

    /// Request timeout; `None` uses the client's configured timeout
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// Create new request options with a generated request ID
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout for this request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Executes one chat-completion call
///
/// `ApiClient` is the production implementation; adapters only see this
/// trait so tests can substitute a stub.
#[async_trait]
pub trait ChatExecutor: Send + Sync {
    /// Send `request` and return the parsed success payload
    async fn execute_json(
        &self,
        request: &ChatRequest,
        options: RequestOptions,
    ) -> ClientResult<ChatResponse>;
}
