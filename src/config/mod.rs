//! Configuration management for consentsync.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! consentsync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CONSENTSYNC_*` environment variable overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [ripple]
//! base_url = "https://ripple.example.com/api"
//! api_token = "${CONSENTSYNC_RIPPLE_API_TOKEN}"
//!
//! [[ripple.study_groups]]
//! name = "HBN - Main"
//! study_id = "5d1a..."
//!
//! [[ripple.study_groups]]
//! name = "HBN - Waitlist"
//! study_id = "5d1b..."
//!
//! [redcap]
//! base_url = "https://redcap.example.com/api/"
//! dev_token = "${CONSENTSYNC_REDCAP_DEV_TOKEN}"
//! prod_token = "${CONSENTSYNC_REDCAP_PROD_TOKEN}"
//!
//! [staging]
//! dir = "/var/tmp/consentsync"
//! ```
//!
//! API tokens are held as [`SecretString`] values: memory is zeroed on drop
//! and Debug output is redacted.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, LoggingConfig, ProjectEnv, RedcapConfig, RippleConfig, StagingConfig,
    StudyGroupConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
