//! Unified error handling for the PABX billing system
//!
//! This module provides a single error type covering all failure scenarios
//! in the workspace, with stable machine-readable error codes for the API
//! boundary that sits above this library.

use thiserror::Error;

use crate::models::CallType;

/// Main application error type
///
/// All errors in the workspace should be converted to this type.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    // ==================== Business Logic Errors ====================
    #[error("No rate configured for call type: {0}")]
    RateNotFound(CallType),

    #[error("Multiple rates configured for call type: {0}")]
    DuplicateRate(CallType),

    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Call not found: {0}")]
    CallNotFound(i32),

    #[error("Invoice not found: {0}")]
    InvoiceNotFound(i32),

    #[error("Invalid invoice status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the stable error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::MissingField(_) => "missing_field",
            AppError::InvalidDateRange { .. } => "invalid_date_range",
            AppError::RateNotFound(_) => "rate_not_found",
            AppError::DuplicateRate(_) => "duplicate_rate",
            AppError::DepartmentNotFound(_) => "department_not_found",
            AppError::CallNotFound(_) => "call_not_found",
            AppError::InvoiceNotFound(_) => "invoice_not_found",
            AppError::InvalidStatusTransition { .. } => "invalid_status_transition",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// Whether the error is caused by bad caller input rather than state
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::InvalidInput(_)
                | AppError::MissingField(_)
                | AppError::InvalidDateRange { .. }
        )
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::RateNotFound(CallType::Local).error_code(),
            "rate_not_found"
        );
        assert_eq!(
            AppError::DuplicateRate(CallType::International).error_code(),
            "duplicate_rate"
        );
        assert_eq!(
            AppError::InvalidDateRange {
                start: "2024-02-01".to_string(),
                end: "2024-01-01".to_string(),
            }
            .error_code(),
            "invalid_date_range"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AppError::Validation("bad".to_string()).is_client_error());
        assert!(!AppError::CallNotFound(7).is_client_error());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::RateNotFound(CallType::LongDistance);
        assert_eq!(
            err.to_string(),
            "No rate configured for call type: long-distance"
        );
    }
}
