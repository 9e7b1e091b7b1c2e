//! PABX Billing Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the PABX call billing system. It includes:
//!
//! - Domain models (CallRecord, Rate, Department, Invoice)
//! - The closed call-type classification and date-range handling
//! - Storage traits the billing engine aggregates against
//! - Unified error handling
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
