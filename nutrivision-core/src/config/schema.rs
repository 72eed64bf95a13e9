//! Configuration schema with serde support

use super::error::ConfigError;
use super::secrets::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the API credential
pub const API_KEY_VAR: &str = "GROQ_API_KEY";

/// Base URL of the OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Multimodal model used for food photos
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// Smaller, faster text model used for meal plans
pub const DEFAULT_PLAN_MODEL: &str = "llama-3.1-8b-instant";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connect timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Largest accepted image upload (4 MiB, the provider's inline image limit)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NutriConfig {
    /// API key; `None` leaves the app usable but every call fails fast
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Base URL for the chat-completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used by the food scanner
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Model used by the meal planner
    #[serde(default = "default_plan_model")]
    pub plan_model: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum image upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Label the data URI with the sniffed MIME type instead of `image/jpeg`
    #[serde(default)]
    pub detect_image_mime: bool,
}

impl Default for NutriConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            vision_model: default_vision_model(),
            plan_model: default_plan_model(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            detect_image_mime: false,
        }
    }
}

impl NutriConfig {
    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<SecretString>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The API key, or the configuration error to show the user
    pub fn api_key(&self) -> Result<&SecretString, ConfigError> {
        match &self.api_key {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey {
                var: API_KEY_VAR.to_string(),
            }),
        }
    }

    /// Whether a usable API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Drop blank keys so "set but empty" behaves like "unset"
    pub(crate) fn normalize(&mut self) {
        if self.api_key.as_ref().is_some_and(SecretString::is_empty) {
            self.api_key = None;
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_vision_model() -> String {
    DEFAULT_VISION_MODEL.to_string()
}

fn default_plan_model() -> String {
    DEFAULT_PLAN_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}
