//! NutriVision Core Library
//!
//! This crate turns a food photo into a nutrition breakdown and a list of
//! ingredients into a meal plan by calling a hosted OpenAI-compatible
//! chat-completions endpoint.

pub mod adapters;
pub mod app;
pub mod artifact;
pub mod config;
pub mod fun_facts;
pub mod http;
pub mod protocol;
pub mod upload;

pub use adapters::{ImageAnalysisAdapter, Reply, TextPlanAdapter};
pub use app::{NutriApp, PlanOutcome};
pub use artifact::PlanArtifact;
pub use config::{ConfigError, NutriConfig};
pub use http::{ApiClient, ApiError, ChatExecutor, ClientError};
pub use upload::{ImageUpload, UploadError};

/// Returns the version of the NutriVision Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
