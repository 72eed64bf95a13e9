//! Food photo analysis

use super::prompts::FOOD_ANALYSIS_PROMPT;
use super::{extract_content, Reply, MAX_COMPLETION_TOKENS, TEMPERATURE};
use crate::http::{ChatExecutor, ClientResult, RequestOptions};
use crate::protocol::{ChatRequest, ContentPart, Message};
use crate::upload::ImageMime;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, warn};

const FAILURE_FALLBACK: &str = "Sorry, there was an error analyzing the image.";

/// Turns image bytes into a nutrition breakdown
///
/// By default the data URI is always labelled `image/jpeg`, whatever the
/// upload actually is. [`with_mime_detection`](Self::with_mime_detection)
/// switches to the sniffed type, falling back to JPEG when unrecognised.
#[derive(Clone)]
pub struct ImageAnalysisAdapter {
    executor: Arc<dyn ChatExecutor>,
    model: String,
    detect_mime: bool,
}

impl ImageAnalysisAdapter {
    pub fn new(executor: Arc<dyn ChatExecutor>, model: impl Into<String>) -> Self {
        Self {
            executor,
            model: model.into(),
            detect_mime: false,
        }
    }

    pub fn with_mime_detection(mut self, detect: bool) -> Self {
        self.detect_mime = detect;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Standard (padded) base64 encoding of the image bytes
    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    /// MIME type written into the data URI for `bytes`
    pub fn mime_for(&self, bytes: &[u8]) -> ImageMime {
        if self.detect_mime {
            ImageMime::sniff(bytes).unwrap_or(ImageMime::Jpeg)
        } else {
            ImageMime::Jpeg
        }
    }

    /// `data:<mime>;base64,<payload>` for `bytes`
    pub fn data_uri(&self, bytes: &[u8]) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_for(bytes).as_str(),
            Self::encode(bytes)
        )
    }

    /// One user message: the instruction text, then the image
    pub fn build_request(&self, bytes: &[u8]) -> ChatRequest {
        let message = Message::user_parts(vec![
            ContentPart::text(FOOD_ANALYSIS_PROMPT),
            ContentPart::image_url(self.data_uri(bytes)),
        ]);

        ChatRequest::new(self.model.clone(), message)
            .with_temperature(TEMPERATURE)
            .with_max_completion_tokens(MAX_COMPLETION_TOKENS)
    }

    /// Analyze `bytes`, returning the typed error on failure
    pub async fn try_analyze(&self, bytes: &[u8]) -> ClientResult<String> {
        debug!("Analyzing image of {} bytes", bytes.len());
        let request = self.build_request(bytes);
        let response = self
            .executor
            .execute_json(&request, RequestOptions::new())
            .await?;
        extract_content(response)
    }

    /// Analyze `bytes`, converting any failure into a displayable message
    pub async fn analyze(&self, bytes: &[u8]) -> Reply {
        let result = self.try_analyze(bytes).await;
        if let Err(err) = &result {
            warn!("Image analysis failed: {}", err);
        }
        Reply::from_result(result, FAILURE_FALLBACK)
    }
}
