//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for consentsync using
//! clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// consentsync - Ripple to REDCap consent forwarding
#[derive(Parser, Debug)]
#[command(name = "consentsync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "consentsync.toml",
        env = "CONSENTSYNC_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CONSENTSYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one sync run from Ripple to REDCap
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectEnv;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["consentsync", "run"]);
        assert_eq!(cli.config, "consentsync.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_with_env() {
        let cli = Cli::parse_from(["consentsync", "run", "--env", "prod"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.env, ProjectEnv::Prod);
        } else {
            panic!("expected run command");
        }
    }

    #[test]
    fn test_cli_run_defaults_to_dev() {
        let cli = Cli::parse_from(["consentsync", "run"]);
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.env, ProjectEnv::Dev);
        } else {
            panic!("expected run command");
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["consentsync", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["consentsync", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["consentsync", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["consentsync", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
