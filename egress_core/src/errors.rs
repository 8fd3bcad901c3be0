//! # Error Types
//!
//! Structured error types for egress_core. Every failure is terminal for the
//! action that triggered it and is reported back to the caller; nothing is
//! retried.
//!
//! ## Example
//!
//! ```rust
//! use egress_core::errors::{CalcError, CalcResult};
//!
//! fn validate_area(floor_area: f64) -> CalcResult<()> {
//!     if floor_area <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "floor_area".to_string(),
//!             value: floor_area.to_string(),
//!             reason: "Floor area must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_area(-5.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for egress_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation and session operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// A required field is missing at calculate time
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// An input value is present but unusable (non-positive area, zero doors, bad index)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Code version or occupancy not present in the code table
    #[error("Unknown {table} key: '{key}'")]
    UnknownLookupKey { table: String, key: String },

    /// The session has no building to act on
    #[error("No building selected - add a building first")]
    NoBuilding,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Malformed or structurally incompatible project JSON
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownLookupKey error
    pub fn unknown_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownLookupKey {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// True for errors caused by what the user typed or selected, as opposed
    /// to files on disk.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            CalcError::MissingField { .. }
                | CalcError::InvalidInput { .. }
                | CalcError::UnknownLookupKey { .. }
                | CalcError::NoBuilding
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownLookupKey { .. } => "UNKNOWN_LOOKUP_KEY",
            CalcError::NoBuilding => "NO_BUILDING",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::serialization(e)
    }
}
