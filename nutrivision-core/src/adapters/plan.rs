//! Meal plan generation

use super::prompts::meal_plan_prompt;
use super::{extract_content, Reply, MAX_COMPLETION_TOKENS, TEMPERATURE};
use crate::http::{ChatExecutor, ClientResult, RequestOptions};
use crate::protocol::{ChatRequest, Message};
use std::sync::Arc;
use tracing::{debug, warn};

const FAILURE_FALLBACK: &str = "Sorry, there was an error generating the dietary plan.";

/// Turns a description of foods and goals into a meal plan
#[derive(Clone)]
pub struct TextPlanAdapter {
    executor: Arc<dyn ChatExecutor>,
    model: String,
}

impl TextPlanAdapter {
    pub fn new(executor: Arc<dyn ChatExecutor>, model: impl Into<String>) -> Self {
        Self {
            executor,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request, or `None` for blank input
    pub fn build_request(&self, user_input: &str) -> Option<ChatRequest> {
        if user_input.trim().is_empty() {
            return None;
        }

        let request = ChatRequest::new(self.model.clone(), Message::user(meal_plan_prompt(user_input)))
            .with_temperature(TEMPERATURE)
            .with_max_completion_tokens(MAX_COMPLETION_TOKENS);
        Some(request)
    }

    /// Generate a plan, returning the typed error on failure
    ///
    /// `Ok(None)` means the input was blank and nothing was sent.
    pub async fn try_generate(&self, user_input: &str) -> ClientResult<Option<String>> {
        let Some(request) = self.build_request(user_input) else {
            debug!("Blank meal plan input, no request sent");
            return Ok(None);
        };

        let response = self
            .executor
            .execute_json(&request, RequestOptions::new())
            .await?;
        extract_content(response).map(Some)
    }

    /// Generate a plan for display
    ///
    /// Returns `None` for blank input (the action is a no-op), otherwise the
    /// answer or a failure message.
    pub async fn generate(&self, user_input: &str) -> Option<Reply> {
        match self.try_generate(user_input).await {
            Ok(None) => None,
            Ok(Some(plan)) => Some(Reply::Answer(plan)),
            Err(err) => {
                warn!("Meal plan generation failed: {}", err);
                Some(Reply::from_result(Err(err), FAILURE_FALLBACK))
            }
        }
    }
}
