use clap::Parser;
use consentsync::cli::{Cli, Commands};
use consentsync::config::{load_config, LoggingConfig};
use consentsync::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // The logging section of the config file drives file logging; if the
    // config cannot be loaded yet, fall back to console-only defaults and
    // let the command report the load error with the right exit code.
    let (logging_config, config_log_level) = match load_config(&cli.config) {
        Ok(config) => (config.logging.clone(), Some(config.application.log_level)),
        Err(_) => (LoggingConfig::default(), None),
    };

    let log_level = cli
        .log_level
        .clone()
        .or(config_log_level)
        .unwrap_or_else(|| "info".to_string());

    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "consentsync - Ripple to REDCap consent forwarding"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // Exit with appropriate code
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
