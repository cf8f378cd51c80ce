//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the consentsync configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Validate configuration
        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!("  Ripple Server: {}", config.ripple.base_url);
                println!("  Study Groups: {}", config.ripple.study_groups.len());
                for group in &config.ripple.study_groups {
                    println!("    - {} (study {})", group.name, group.study_id);
                }
                println!("  REDCap Server: {}", config.redcap.base_url);
                println!("  Staging Directory: {}", config.staging.dir);
                println!(
                    "  Local Logging: {}",
                    if config.logging.local_enabled {
                        "enabled"
                    } else {
                        "disabled"
                    }
                );
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2) // Configuration error exit code
            }
        }
    }
}
