//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - JSON-formatted logs
//! - Configurable log levels
//! - Local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use consentsync::logging::init_logging;
//! use consentsync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! // Use tracing macros for logging
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a study group export
///
/// # Example
///
/// ```no_run
/// use consentsync::log_export_start;
///
/// log_export_start!("HBN - Main", "study-1");
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($study_group:expr, $study_id:expr) => {
        tracing::info!(
            study_group = %$study_group,
            study_id = %$study_id,
            "Starting participant export"
        );
    };
}

/// Log the completion of a push to the destination
///
/// # Example
///
/// ```no_run
/// use consentsync::log_push_complete;
/// use std::time::Duration;
///
/// let count = 42;
/// let duration = Duration::from_secs(10);
/// log_push_complete!(count, duration);
/// ```
#[macro_export]
macro_rules! log_push_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Push completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use consentsync::log_error_with_context;
/// use consentsync::domain::SyncError;
///
/// let error = SyncError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::SyncError;
    use std::time::Duration;

    // Emitting without a subscriber installed is a no-op, which is all
    // these can assert; output formatting is the tracing crate's concern.
    #[test]
    fn test_macros_emit() {
        crate::log_export_start!("HBN - Main", "study-1");
        crate::log_push_complete!(42, Duration::from_secs(10));

        let error = SyncError::Configuration("missing token".to_string());
        crate::log_error_with_context!(&error, "loading configuration");
    }
}
