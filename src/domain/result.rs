//! Result type alias for consentsync
//!
//! This module provides a convenient Result type alias that uses SyncError
//! as the error type.

use super::errors::SyncError;

/// Result type alias for consentsync operations
///
/// This is a convenience type alias that uses `SyncError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use consentsync::domain::result::Result;
/// use consentsync::domain::errors::SyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SyncError::DataShape("non-numeric MRN".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SyncError>;
