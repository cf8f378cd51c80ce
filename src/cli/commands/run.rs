//! Run command implementation
//!
//! Executes one sync run: extract from Ripple, reconcile against REDCap,
//! push, and write consent status back.

use crate::config::{load_config, ProjectEnv};
use crate::core::run::RunCoordinator;
use clap::Args;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Which REDCap project environment to target
    #[arg(long, value_enum, default_value_t = ProjectEnv::Dev)]
    pub env: ProjectEnv,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(env = %self.env, "Starting run command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                crate::log_error_with_context!(&e, "loading configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let coordinator = match RunCoordinator::new(config, self.env) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create run coordinator");
                eprintln!("Failed to initialize run: {e}");
                return Ok(4);
            }
        };

        let summary = match coordinator.execute_run().await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(&e, "executing sync run");
                eprintln!("Run failed: {e}");
                return Ok(5);
            }
        };

        println!();
        println!("Run Summary ({}):", summary.run_id);
        if summary.no_eligible_data {
            println!("  No eligible data this run; nothing was forwarded.");
            println!("  Extracted rows: {}", summary.extracted_rows);
        } else {
            println!("  Extracted rows: {}", summary.extracted_rows);
            println!("  Eligible rows: {}", summary.eligible_rows);
            println!("  Projected rows: {}", summary.projected_rows);
            println!("  Pushed to REDCap: {}", summary.total_pushed());
            println!("  Created in REDCap: {}", summary.created);
            println!("  Updated in REDCap: {}", summary.updated);
            println!("  Study groups written back: {}", summary.groups_written_back);
        }
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_args_default_env() {
        let args = RunArgs {
            env: ProjectEnv::Dev,
        };
        assert_eq!(args.env, ProjectEnv::Dev);
    }
}
