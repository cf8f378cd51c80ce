//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "consentsync.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing consentsync configuration");
        println!();

        // Check if file already exists
        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        // Generate configuration content
        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        // Write to file
        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set CONSENTSYNC_RIPPLE_API_TOKEN");
                println!("     - Set CONSENTSYNC_REDCAP_DEV_TOKEN and CONSENTSYNC_REDCAP_PROD_TOKEN");
                println!("  3. Validate configuration: consentsync validate-config");
                println!("  4. Run a sync: consentsync run --env dev");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# consentsync Configuration File
# Ripple to REDCap consent forwarding

[application]
log_level = "info"

[ripple]
base_url = "https://ripple.example.com/api/v2"
api_token = "${CONSENTSYNC_RIPPLE_API_TOKEN}"

[[ripple.study_groups]]
name = "HBN - Main"
study_id = "your-study-id"

[redcap]
base_url = "https://redcap.example.com/api/"
dev_token = "${CONSENTSYNC_REDCAP_DEV_TOKEN}"
prod_token = "${CONSENTSYNC_REDCAP_PROD_TOKEN}"

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# consentsync Configuration File
# Ripple to REDCap consent forwarding
#
# This file contains all configuration options with examples and explanations.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Ripple Registry Configuration
# ============================================================================
[ripple]
# Base URL of the Ripple API
base_url = "https://ripple.example.com/api/v2"

# API token, sent as a bearer header (use environment variable)
api_token = "${CONSENTSYNC_RIPPLE_API_TOKEN}"

# Request timeout in seconds
timeout_seconds = 30

# Fields requested from the participant export
export_fields = ["globalId", "customId", "cv.consent_form", "Participant Contacts"]

# Additional opaque headers required by the deployment
# [ripple.extra_headers]
# X-Requested-With = "consentsync"

# Study groups to export, one API call each. The name must match the
# group tag carried in the exported rows; the study_id goes into the URL.
[[ripple.study_groups]]
name = "HBN - Main"
study_id = "your-study-id"

# [[ripple.study_groups]]
# name = "HBN - Satellite"
# study_id = "another-study-id"

# ============================================================================
# REDCap Destination Configuration
# ============================================================================
[redcap]
# REDCap API endpoint URL
base_url = "https://redcap.example.com/api/"

# Project tokens (use environment variables). `run --env dev` uses
# dev_token, `run --env prod` uses prod_token.
dev_token = "${CONSENTSYNC_REDCAP_DEV_TOKEN}"
prod_token = "${CONSENTSYNC_REDCAP_PROD_TOKEN}"

# Request timeout in seconds
timeout_seconds = 30

# ============================================================================
# Staging Configuration
# ============================================================================
[staging]
# Base directory for per-run staging directories. Each run stages its
# import payloads under <dir>/run-<uuid>/ and removes them on exit.
# Defaults to a consentsync directory under the system temp dir.
# dir = "/var/tmp/consentsync"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging (JSON lines, rotated)
local_enabled = true

# Local log file path
local_path = "/var/log/consentsync"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}
