//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine surfaces to its callers. None of them are
//! retried internally; retry policy belongs to the caller.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/payroll.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/payroll.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An employee's contract terms are missing or invalid for their contract kind.
    #[error("Invalid contract for employee '{employee_id}', field '{field}': {message}")]
    ConfigurationError {
        /// The employee whose contract is invalid.
        employee_id: String,
        /// The contract field that is missing or invalid.
        field: String,
        /// A description of what is wrong with the field.
        message: String,
    },

    /// An attendance record already exists for the employee and day.
    #[error("Attendance already recorded for employee '{employee_id}' on {date}")]
    ConflictError {
        /// The employee the duplicate record belongs to.
        employee_id: String,
        /// The calendar day that already holds a record.
        date: NaiveDate,
    },

    /// An operation was attempted in a lifecycle state that forbids it.
    #[error("Illegal state for {entity}: {message}")]
    StateError {
        /// The entity whose state forbids the operation (e.g. "pay_cycle").
        entity: String,
        /// A description of the violated lifecycle rule.
        message: String,
    },

    /// An input value was rejected.
    #[error("Invalid value '{value}' for '{field}': {message}")]
    ValidationError {
        /// The field that was rejected.
        field: String,
        /// The attempted value.
        value: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// The storage collaborator failed.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn state(entity: &str, message: impl Into<String>) -> Self {
        EngineError::StateError {
            entity: entity.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn validation(
        field: &str,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        EngineError::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
