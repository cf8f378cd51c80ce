//! Configuration schema types
//!
//! This module defines the configuration structure for consentsync.

use crate::config::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Which REDCap project environment a run targets
///
/// Selects the destination API token; nothing else differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProjectEnv {
    /// Development REDCap project
    #[default]
    Dev,
    /// Production REDCap project
    Prod,
}

impl fmt::Display for ProjectEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectEnv::Dev => write!(f, "dev"),
            ProjectEnv::Prod => write!(f, "prod"),
        }
    }
}

impl FromStr for ProjectEnv {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(ProjectEnv::Dev),
            "prod" => Ok(ProjectEnv::Prod),
            other => Err(format!("Invalid environment '{other}'. Must be dev or prod")),
        }
    }
}

/// Main consentsync configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Application-level settings
    pub application: ApplicationConfig,

    /// Ripple registry configuration
    pub ripple: RippleConfig,

    /// REDCap destination configuration
    pub redcap: RedcapConfig,

    /// Staging-artifact configuration
    #[serde(default)]
    pub staging: StagingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.ripple.validate()?;
        self.redcap.validate()?;
        self.staging.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// One configured study group and its Ripple study identifier
#[derive(Debug, Clone, Deserialize)]
pub struct StudyGroupConfig {
    /// Group tag as it appears in the data (e.g. "HBN - Main")
    pub name: String,

    /// Ripple study ID used in export/import URLs
    pub study_id: String,
}

/// Ripple registry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RippleConfig {
    /// Base URL of the Ripple API
    pub base_url: String,

    /// API token, sent as a bearer header on export and import calls
    pub api_token: SecretString,

    /// Additional opaque headers required by the deployment
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,

    /// Study groups to export, one API call each
    pub study_groups: Vec<StudyGroupConfig>,

    /// Fields requested from the export endpoint
    #[serde(default = "default_export_fields")]
    pub export_fields: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl RippleConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("ripple.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "ripple.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.study_groups.is_empty() {
            return Err("ripple.study_groups cannot be empty".to_string());
        }
        for group in &self.study_groups {
            if group.name.trim().is_empty() || group.study_id.trim().is_empty() {
                return Err("ripple.study_groups entries need a name and a study_id".to_string());
            }
        }
        if self.timeout_seconds == 0 {
            return Err("ripple.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Returns the study_id configured for a group tag, if any
    pub fn study_id_for(&self, group_name: &str) -> Option<&str> {
        self.study_groups
            .iter()
            .find(|g| g.name == group_name)
            .map(|g| g.study_id.as_str())
    }
}

/// REDCap destination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedcapConfig {
    /// REDCap API endpoint URL
    pub base_url: String,

    /// Token for the development project
    pub dev_token: SecretString,

    /// Token for the production project
    pub prod_token: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl RedcapConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("redcap.base_url cannot be empty".to_string());
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(format!(
                "redcap.base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }
        if self.timeout_seconds == 0 {
            return Err("redcap.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Returns the project token for the selected environment
    pub fn token_for(&self, env: ProjectEnv) -> &SecretString {
        match env {
            ProjectEnv::Dev => &self.dev_token,
            ProjectEnv::Prod => &self.prod_token,
        }
    }
}

/// Staging-artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StagingConfig {
    /// Base directory for per-run staging directories
    #[serde(default = "default_staging_dir")]
    pub dir: String,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: default_staging_dir(),
        }
    }
}

impl StagingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.dir.trim().is_empty() {
            return Err("staging.dir cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".into());
        }
        if !["daily", "hourly"].contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be daily or hourly",
                self.local_rotation
            ));
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_staging_dir() -> String {
    std::env::temp_dir()
        .join("consentsync")
        .to_string_lossy()
        .to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

fn default_export_fields() -> Vec<String> {
    [
        "globalId",
        "customId",
        "cv.consent_form",
        "Participant Contacts",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
