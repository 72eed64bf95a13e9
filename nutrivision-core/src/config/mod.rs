//! Configuration module for NutriVision
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then environment variables (after a `.env` file has been loaded). The API
//! key is read once here and handed to the HTTP client; its absence is not a
//! load error.

mod env;
mod error;
mod schema;
mod secrets;
mod validator;

pub use env::{
    apply_env_overrides, interpolate_env_vars, load_dotenv, process_env, BASE_URL_VAR,
    CONFIG_PATH_VAR, DETECT_MIME_VAR, MAX_UPLOAD_VAR, PLAN_MODEL_VAR, TIMEOUT_VAR,
    VISION_MODEL_VAR,
};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use schema::{
    NutriConfig, API_KEY_VAR, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PLAN_MODEL, DEFAULT_TIMEOUT_SECS, DEFAULT_VISION_MODEL,
};
pub use secrets::SecretString;
pub use validator::ConfigValidator;

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

impl NutriConfig {
    /// Load configuration for the running process
    ///
    /// Reads `.env`, then `path` (or `NUTRIVISION_CONFIG` when `path` is
    /// `None`), then the process environment.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        load_dotenv();
        Self::from_sources(path, process_env)
    }

    /// Load configuration from an explicit file and variable lookup
    pub fn from_sources<F>(path: Option<&Path>, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_PATH_VAR).map(PathBuf::from));

        let mut config = match path {
            Some(path) => load_from_yaml(&path, &lookup)?,
            None => NutriConfig::default(),
        };

        apply_env_overrides(&mut config, &lookup)?;
        config.normalize();

        ConfigValidator::new().validate(&config)?;
        debug!(
            "Configuration loaded: base_url={}, vision_model={}, plan_model={}, api_key={}",
            config.base_url,
            config.vision_model,
            config.plan_model,
            config
                .api_key
                .as_ref()
                .map(SecretString::partial_redact)
                .unwrap_or_else(|| "[MISSING]".to_string())
        );
        Ok(config)
    }
}

/// Load a configuration from a YAML file, interpolating `${VAR}` references
pub fn load_from_yaml<F>(path: &Path, lookup: F) -> ConfigResult<NutriConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;

    // Interpolate environment variables before parsing
    let interpolated = interpolate_env_vars(&content, lookup)?;

    serde_yaml::from_str(&interpolated).map_err(|e| ConfigError::ParseError {
        path: path.to_string_lossy().to_string(),
        line: e.location().map(|l| l.line()),
        column: e.location().map(|l| l.column()),
        message: e.to_string(),
    })
}
