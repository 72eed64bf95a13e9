//! HTTP client implementation using reqwest

use crate::config::{ConfigError, NutriConfig, SecretString, API_KEY_VAR};
use crate::http::error::{map_transport_error, ApiError, ClientError, ClientResult};
use crate::http::{ChatExecutor, RequestOptions, CHAT_COMPLETIONS_PATH};
use crate::protocol::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("nutrivision/", env!("CARGO_PKG_VERSION"));

/// Client for the chat-completions endpoint
///
/// Holds the API key read at startup. When the key is absent every call
/// fails with a configuration error before touching the network.
#[derive(Clone)]
pub struct ApiClient {
    /// The underlying reqwest client
    client: Client,

    /// Full URL of the chat-completions call
    endpoint: String,

    /// Bearer credential, if configured
    api_key: Option<SecretString>,

    /// Whole-request timeout
    timeout: Duration,

    /// Largest response body read from the wire, on any status
    max_response_size: usize,
}

impl ApiClient {
    /// Create a client from the loaded configuration
    pub fn new(config: &NutriConfig) -> ClientResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout())
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| ClientError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                CHAT_COMPLETIONS_PATH
            ),
            api_key: config.api_key().ok().cloned(),
            timeout: config.timeout(),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether calls can be attempted at all
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Override the response body limit
    pub fn with_max_response_size(mut self, max_response_size: usize) -> Self {
        self.max_response_size = max_response_size;
        self
    }

    fn too_large(&self, size: u64, request_id: Uuid) -> ClientError {
        ClientError::MalformedResponse {
            message: format!(
                "Response size {} exceeds maximum {} [request_id: {}]",
                size, self.max_response_size, request_id
            ),
        }
    }

    /// Read the body, refusing anything over `max_response_size`
    ///
    /// A declared `Content-Length` is checked before reading; chunked bodies
    /// are cut off as soon as they pass the limit.
    async fn read_body(
        &self,
        mut response: Response,
        timeout: Duration,
        request_id: Uuid,
    ) -> ClientResult<String> {
        let limit = self.max_response_size as u64;
        if let Some(content_length) = response.content_length() {
            if content_length > limit {
                return Err(self.too_large(content_length, request_id));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| map_transport_error(e, timeout, request_id))?
        {
            let read = (body.len() + chunk.len()) as u64;
            if read > limit {
                return Err(self.too_large(read, request_id));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn api_key(&self) -> ClientResult<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| {
            ClientError::Configuration(ConfigError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            })
        })
    }
}

#[async_trait]
impl ChatExecutor for ApiClient {
    async fn execute_json(
        &self,
        request: &ChatRequest,
        options: RequestOptions,
    ) -> ClientResult<ChatResponse> {
        let request_id = options.request_id;
        let timeout = options.timeout.unwrap_or(self.timeout);

        // Fail fast: nothing below may run without a key
        let api_key = self.api_key().inspect_err(|_| {
            warn!("API key missing, request not sent [request_id: {}]", request_id);
        })?;

        request.validate()?;

        info!(
            "Sending chat completion for model {} [request_id: {}]",
            request.model, request_id
        );
        debug!("Request URL: {}", self.endpoint);

        let body = serde_json::to_vec(request).map_err(|e| {
            ClientError::Serialization(format!("{} [request_id: {}]", e, request_id))
        })?;

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(timeout)
            .header(AUTHORIZATION, format!("Bearer {}", api_key.expose_secret()))
            .header(CONTENT_TYPE, "application/json")
            .header("X-Request-ID", request_id.to_string())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                let mapped = map_transport_error(e, timeout, request_id);
                error!("Request failed [request_id: {}]: {}", request_id, mapped);
                mapped
            })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        let response_text = self
            .read_body(response, timeout, request_id)
            .await
            .inspect_err(|e| warn!("Discarding response [request_id: {}]: {}", request_id, e))?;

        if status != StatusCode::OK {
            let api_error = ApiError::new(status.as_u16(), response_text);
            warn!(
                "Request failed with status {} ({}) [request_id: {}]: {}",
                api_error.status_code,
                api_error.kind(),
                request_id,
                api_error
                    .provider_message()
                    .unwrap_or_else(|| "no error message".to_string())
            );
            return Err(ClientError::Api(api_error));
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                "Failed to parse response [request_id: {}]: {}",
                request_id, e
            );
            ClientError::MalformedResponse {
                message: format!("Invalid response format: {} [request_id: {}]", e, request_id),
            }
        })?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Token usage: prompt={}, completion={}, total={} [request_id: {}]",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens, request_id
            );
        }
        info!("Request completed successfully [request_id: {}]", request_id);

        Ok(parsed)
    }
}
