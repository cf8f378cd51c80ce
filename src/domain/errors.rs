//! Domain error types
//!
//! This module defines the error hierarchy for consentsync. All errors are
//! domain-specific and don't expose third-party types; reqwest and csv
//! failures are converted at the adapter boundary.

use thiserror::Error;

/// Main consentsync error type
///
/// This is the primary error type used throughout the application.
/// It wraps system-specific error types and provides context for error
/// handling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Extraction produced zero eligible rows
    ///
    /// Not a failure: a control signal meaning "nothing to forward this
    /// run". Only the run orchestrator recovers from it; everywhere else
    /// it propagates like any other error.
    #[error("no eligible data to forward")]
    NoEligibleData,

    /// Malformed input from the source system (bad join key, missing column)
    #[error("data shape error: {0}")]
    DataShape(String),

    /// Ripple-related errors
    #[error("Ripple error: {0}")]
    Ripple(#[from] RippleError),

    /// REDCap-related errors
    #[error("REDCap error: {0}")]
    Redcap(#[from] RedcapError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Staging artifact errors
    #[error("Staging error: {0}")]
    Staging(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl SyncError {
    /// Whether this value is the no-data control signal rather than a failure
    pub fn is_no_eligible_data(&self) -> bool {
        matches!(self, SyncError::NoEligibleData)
    }
}

/// Ripple-specific errors
///
/// Errors that occur when talking to the Ripple registry. These errors
/// don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum RippleError {
    /// Failed to connect to the Ripple API
    #[error("Failed to connect to Ripple: {0}")]
    ConnectionFailed(String),

    /// Export request was rejected
    #[error("Export failed: {status} - {message}")]
    ExportFailed { status: u16, message: String },

    /// Status import (writeback) was rejected
    #[error("Status import failed for study group '{study_group}': {status} - {message}")]
    ImportFailed {
        study_group: String,
        status: u16,
        message: String,
    },

    /// Response body could not be parsed as the expected tabular payload
    #[error("Invalid export payload: {0}")]
    InvalidPayload(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

/// REDCap-specific errors
///
/// Errors that occur when talking to the REDCap API.
#[derive(Debug, Error)]
pub enum RedcapError {
    /// Failed to connect to the REDCap API
    #[error("Failed to connect to REDCap: {0}")]
    ConnectionFailed(String),

    /// Record lookup export was rejected
    #[error("Record lookup failed: {status} - {message}")]
    LookupFailed { status: u16, message: String },

    /// Record import was rejected
    #[error("Import ({mode}) failed: {status} - {message}")]
    ImportFailed {
        mode: String,
        status: u16,
        message: String,
    },

    /// Response body could not be parsed
    #[error("Invalid response from REDCap: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv errors (staging artifacts are CSV)
impl From<csv::Error> for SyncError {
    fn from(err: csv::Error) -> Self {
        SyncError::Staging(err.to_string())
    }
}
