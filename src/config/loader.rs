//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use crate::config::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (CONSENTSYNC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, TOML parsing fails, a
/// referenced environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use consentsync::config::load_config;
///
/// let config = load_config("consentsync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| SyncError::Configuration(format!("Configuration validation failed: {}", e)))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are skipped so documentation examples in the file don't
/// trigger missing-variable errors.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the CONSENTSYNC_* prefix
///
/// For example: `CONSENTSYNC_RIPPLE_BASE_URL`, `CONSENTSYNC_REDCAP_DEV_TOKEN`.
fn apply_env_overrides(config: &mut SyncConfig) {
    if let Ok(val) = std::env::var("CONSENTSYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("CONSENTSYNC_RIPPLE_BASE_URL") {
        config.ripple.base_url = val;
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_RIPPLE_API_TOKEN") {
        config.ripple.api_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_RIPPLE_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.ripple.timeout_seconds = secs;
        }
    }

    if let Ok(val) = std::env::var("CONSENTSYNC_REDCAP_BASE_URL") {
        config.redcap.base_url = val;
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_REDCAP_DEV_TOKEN") {
        config.redcap.dev_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_REDCAP_PROD_TOKEN") {
        config.redcap.prod_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_REDCAP_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.redcap.timeout_seconds = secs;
        }
    }

    if let Ok(val) = std::env::var("CONSENTSYNC_STAGING_DIR") {
        config.staging.dir = val;
    }

    if let Ok(val) = std::env::var("CONSENTSYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CONSENTSYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
