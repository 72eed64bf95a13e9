//! Environment handling: `.env` loading, `${VAR}` interpolation and overrides

use super::error::ConfigError;
use super::schema::{NutriConfig, API_KEY_VAR};
use super::secrets::SecretString;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

/// Overrides the base URL
pub const BASE_URL_VAR: &str = "NUTRIVISION_BASE_URL";
/// Overrides the food scanner model
pub const VISION_MODEL_VAR: &str = "NUTRIVISION_VISION_MODEL";
/// Overrides the meal planner model
pub const PLAN_MODEL_VAR: &str = "NUTRIVISION_PLAN_MODEL";
/// Overrides the request timeout (seconds)
pub const TIMEOUT_VAR: &str = "NUTRIVISION_TIMEOUT_SECS";
/// Overrides the upload size bound (bytes)
pub const MAX_UPLOAD_VAR: &str = "NUTRIVISION_MAX_UPLOAD_BYTES";
/// Enables MIME sniffing for uploads ("1"/"true")
pub const DETECT_MIME_VAR: &str = "NUTRIVISION_DETECT_IMAGE_MIME";
/// Path to an optional YAML config file
pub const CONFIG_PATH_VAR: &str = "NUTRIVISION_CONFIG";

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
});

/// Look up a variable in the process environment
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

/// Load a `.env` file from the working directory or its parents, if any
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenv::dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(e) => {
            debug!("No .env file loaded: {}", e);
            None
        }
    }
}

/// Interpolate `${VAR}` references in a configuration string
pub fn interpolate_env_vars<F>(content: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;
    let result = ENV_VAR_PATTERN.replace_all(content, |caps: &regex::Captures<'_>| {
        match lookup(&caps[1]) {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            }
        }
    });

    // Report the first missing variable
    if let Some(var) = missing {
        return Err(ConfigError::EnvVarNotFound { var });
    }

    Ok(result.into_owned())
}

/// Apply environment overrides on top of file/default values
pub fn apply_env_overrides<F>(config: &mut NutriConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_blank(lookup(API_KEY_VAR)) {
        config.api_key = Some(SecretString::new(key));
    }
    if let Some(url) = non_blank(lookup(BASE_URL_VAR)) {
        config.base_url = url;
    }
    if let Some(model) = non_blank(lookup(VISION_MODEL_VAR)) {
        config.vision_model = model;
    }
    if let Some(model) = non_blank(lookup(PLAN_MODEL_VAR)) {
        config.plan_model = model;
    }
    if let Some(raw) = non_blank(lookup(TIMEOUT_VAR)) {
        config.timeout_secs = parse_number(TIMEOUT_VAR, &raw)?;
    }
    if let Some(raw) = non_blank(lookup(MAX_UPLOAD_VAR)) {
        config.max_upload_bytes = parse_number(MAX_UPLOAD_VAR, &raw)?;
    }
    if let Some(raw) = non_blank(lookup(DETECT_MIME_VAR)) {
        config.detect_image_mime = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes");
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_interpolate_env_vars() {
        let lookup = lookup_from(&[("TEST_VAR", "test_value")]);
        let result = interpolate_env_vars("api_key: ${TEST_VAR}", lookup).unwrap();
        assert_eq!(result, "api_key: test_value");
    }

    #[test]
    fn test_missing_env_var() {
        let result = interpolate_env_vars("api_key: ${MISSING_VAR}", lookup_from(&[]));
        match result {
            Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_env_vars() {
        let lookup = lookup_from(&[("VAR1", "value1"), ("VAR2", "value2")]);
        let result = interpolate_env_vars("key1: ${VAR1}, key2: ${VAR2}", lookup).unwrap();
        assert_eq!(result, "key1: value1, key2: value2");
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = NutriConfig::default();
        let lookup = lookup_from(&[
            (API_KEY_VAR, "gsk_live"),
            (PLAN_MODEL_VAR, "other-model"),
            (TIMEOUT_VAR, "5"),
            (DETECT_MIME_VAR, "TRUE"),
        ]);
        apply_env_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.api_key().unwrap().expose_secret(), "gsk_live");
        assert_eq!(config.plan_model, "other-model");
        assert_eq!(config.timeout_secs, 5);
        assert!(config.detect_image_mime);
    }

    #[test]
    fn test_blank_key_is_ignored() {
        let mut config = NutriConfig::default();
        apply_env_overrides(&mut config, lookup_from(&[(API_KEY_VAR, "   ")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_bad_number_reports_variable() {
        let mut config = NutriConfig::default();
        let err = apply_env_overrides(&mut config, lookup_from(&[(TIMEOUT_VAR, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == TIMEOUT_VAR));
    }
}
