//! Application front controller
//!
//! [`NutriApp`] is what a front end drives: one method per button. Each
//! returns `None` when the press is a no-op (nothing selected, blank text, or
//! the same action still running) and `Some` with displayable output
//! otherwise.

use crate::adapters::{missing_key_message, ImageAnalysisAdapter, Reply, TextPlanAdapter};
use crate::artifact::PlanArtifact;
use crate::config::NutriConfig;
use crate::http::{ApiClient, ChatExecutor, ClientResult};
use crate::upload::{ImageUpload, UploadError};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// In-flight flag for one action; a held guard means the button is disabled
#[derive(Debug, Default)]
pub struct ActionLatch {
    busy: AtomicBool,
}

impl ActionLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the action, or `None` if a call is already outstanding
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the latch on drop
#[derive(Debug)]
pub struct LatchGuard<'a> {
    latch: &'a ActionLatch,
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

/// Result of pressing "Generate Meal Plan"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutcome {
    pub reply: Reply,
    /// Offered only when the plan was generated successfully
    pub artifact: Option<PlanArtifact>,
}

/// The food scanner and meal planner behind one configuration
pub struct NutriApp {
    config: NutriConfig,
    scanner: ImageAnalysisAdapter,
    planner: TextPlanAdapter,
    scan_latch: ActionLatch,
    plan_latch: ActionLatch,
}

impl NutriApp {
    /// Build the app with a real HTTP client
    pub fn new(config: NutriConfig) -> ClientResult<Self> {
        let client = ApiClient::new(&config)?;
        Ok(Self::with_executor(config, Arc::new(client)))
    }

    /// Build the app on top of any executor
    pub fn with_executor(config: NutriConfig, executor: Arc<dyn ChatExecutor>) -> Self {
        let scanner = ImageAnalysisAdapter::new(executor.clone(), config.vision_model.clone())
            .with_mime_detection(config.detect_image_mime);
        let planner = TextPlanAdapter::new(executor, config.plan_model.clone());

        Self {
            config,
            scanner,
            planner,
            scan_latch: ActionLatch::new(),
            plan_latch: ActionLatch::new(),
        }
    }

    pub fn config(&self) -> &NutriConfig {
        &self.config
    }

    /// Warning to show at startup, if the API key is missing
    pub fn startup_notice(&self) -> Option<String> {
        if self.config.has_api_key() {
            None
        } else {
            Some(missing_key_message())
        }
    }

    /// Accept a photo from disk using the configured size bound
    pub fn open_upload(&self, path: impl AsRef<Path>) -> Result<ImageUpload, UploadError> {
        ImageUpload::from_path(path, self.config.max_upload_bytes)
    }

    /// "Analyze Nutrition" pressed
    pub async fn press_analyze(&self, upload: Option<&ImageUpload>) -> Option<Reply> {
        let Some(upload) = upload else {
            debug!("Analyze pressed without an image");
            return None;
        };
        let Some(_guard) = self.scan_latch.try_acquire() else {
            warn!("Analysis already in progress, ignoring press");
            return None;
        };

        if !self.config.has_api_key() {
            return Some(Reply::Failure(missing_key_message()));
        }

        debug!("Analyzing upload {}", upload.file_name());
        Some(self.scanner.analyze(upload.bytes()).await)
    }

    /// "Generate Meal Plan" pressed
    pub async fn press_generate_plan(&self, user_input: &str) -> Option<PlanOutcome> {
        if user_input.trim().is_empty() {
            debug!("Generate pressed with blank input");
            return None;
        }
        let Some(_guard) = self.plan_latch.try_acquire() else {
            warn!("Plan generation already in progress, ignoring press");
            return None;
        };

        if !self.config.has_api_key() {
            return Some(PlanOutcome {
                reply: Reply::Failure(missing_key_message()),
                artifact: None,
            });
        }

        let reply = self.planner.generate(user_input).await?;
        let artifact = reply.is_answer().then(|| PlanArtifact::new(reply.text()));
        Some(PlanOutcome { reply, artifact })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_blocks_second_acquire() {
        let latch = ActionLatch::new();
        let guard = latch.try_acquire();
        assert!(guard.is_some());
        assert!(latch.is_busy());
        assert!(latch.try_acquire().is_none());

        drop(guard);
        assert!(!latch.is_busy());
        assert!(latch.try_acquire().is_some());
    }

    #[test]
    fn test_startup_notice() {
        let without_key = NutriApp::new(NutriConfig::default()).unwrap();
        assert!(without_key
            .startup_notice()
            .unwrap()
            .contains("GROQ_API_KEY"));

        let with_key = NutriApp::new(NutriConfig::default().with_api_key("gsk_test")).unwrap();
        assert!(with_key.startup_notice().is_none());
    }
}
