//! Configuration validation utilities

use super::error::ValidationError;
use super::schema::NutriConfig;
use url::Url;

/// Configuration validator
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a fully layered configuration
    ///
    /// A missing API key is not a validation failure: the app still starts
    /// and reports the missing key when an action is triggered.
    pub fn validate(&self, config: &NutriConfig) -> Result<(), ValidationError> {
        self.validate_base_url(config)?;
        self.validate_models(config)?;
        self.validate_limits(config)?;
        Ok(())
    }

    fn validate_base_url(&self, config: &NutriConfig) -> Result<(), ValidationError> {
        let url = Url::parse(&config.base_url)
            .map_err(|e| ValidationError::invalid_url("base_url", e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ValidationError::invalid_url(
                "base_url",
                format!("unsupported scheme '{}'", other),
            )),
        }
    }

    fn validate_models(&self, config: &NutriConfig) -> Result<(), ValidationError> {
        if config.vision_model.trim().is_empty() {
            return Err(ValidationError::required("vision_model"));
        }
        if config.plan_model.trim().is_empty() {
            return Err(ValidationError::required("plan_model"));
        }
        Ok(())
    }

    fn validate_limits(&self, config: &NutriConfig) -> Result<(), ValidationError> {
        if config.timeout_secs == 0 {
            return Err(ValidationError::out_of_range(
                "timeout_secs",
                "must be at least 1 second",
            ));
        }
        if config.connect_timeout_secs == 0 {
            return Err(ValidationError::out_of_range(
                "connect_timeout_secs",
                "must be at least 1 second",
            ));
        }
        if config.max_upload_bytes == 0 {
            return Err(ValidationError::out_of_range(
                "max_upload_bytes",
                "must be positive",
            ));
        }
        Ok(())
    }
}
