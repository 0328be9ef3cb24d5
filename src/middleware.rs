//! # Request Validation
//!
//! Validation shared by the upload and download paths. Validation functions are
//! static methods returning `AppResult`, so handlers apply them with `?`.
//!
//! ## Usage
//!
//! ```rust
//! use memenow_storage_grpc::middleware::ValidationMiddleware;
//!
//! assert!(ValidationMiddleware::validate_filename("report.pdf").is_ok());
//! assert!(ValidationMiddleware::validate_filename("").is_err());
//! assert!(ValidationMiddleware::validate_filename("../etc/passwd").is_err());
//! ```

use crate::errors::{AppError, AppResult};

/// Middleware for validating request parameters.
pub struct ValidationMiddleware;

impl ValidationMiddleware {
    /// Validates that a filename names exactly one entry of the flat store.
    ///
    /// The store maps a filename directly onto a file inside its directory, so
    /// anything that would resolve elsewhere is refused.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest("filename is required")` for an empty name
    /// - `InvalidRequest` for `.`, `..`, or names containing `/`, `\` or NUL
    pub fn validate_filename(filename: &str) -> AppResult<()> {
        if filename.is_empty() {
            return Err(AppError::invalid_request("filename is required"));
        }

        if filename == "." || filename == ".." {
            return Err(AppError::invalid_request(format!(
                "invalid filename {:?}: reserved name",
                filename
            )));
        }

        if filename.contains(['/', '\\', '\0']) {
            return Err(AppError::invalid_request(format!(
                "invalid filename {:?}: path separators are not allowed",
                filename
            )));
        }

        Ok(())
    }
}
