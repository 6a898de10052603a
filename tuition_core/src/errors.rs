//! # Error Types
//!
//! Structured error types for tuition_core. Only the input-validation layer
//! produces these; the arithmetic itself never fails for non-negative inputs
//! (zero denominators yield 0).
//!
//! ## Example
//!
//! ```rust
//! use tuition_core::errors::{CalcError, CalcResult};
//!
//! fn validate_aid(financial_aid: f64) -> CalcResult<()> {
//!     if financial_aid < 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "financial_aid".to_string(),
//!             value: financial_aid.to_string(),
//!             reason: "Financial aid cannot be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for tuition_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for validation and decoding.
///
/// Each variant carries enough context for a caller to point at the
/// offending field without parsing the message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (negative, not finite, too many entries)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A manual override refers to a grade position that does not exist
    #[error("Unknown grade index {index} (scenario has {grade_count} grades)")]
    UnknownGrade { index: usize, grade_count: usize },

    /// JSON serialization/deserialization error
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
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create an UnknownGrade error
    pub fn unknown_grade(index: usize, grade_count: usize) -> Self {
        CalcError::UnknownGrade { index, grade_count }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::UnknownGrade { .. } => "UNKNOWN_GRADE",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

/// Reject negative or non-finite amounts.
///
/// Shared by every `validate()` in the crate so the wording stays uniform.
pub(crate) fn ensure_non_negative(field: impl Into<String>, value: f64, what: &str) -> CalcResult<()> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("{} must be a finite number", what),
        ));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("{} cannot be negative", what),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("financial_aid", "-5000", "Financial aid cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("grades").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::unknown_grade(4, 2).error_code(), "UNKNOWN_GRADE");
    }

    #[test]
    fn test_unknown_grade_message() {
        let msg = CalcError::unknown_grade(4, 2).to_string();
        assert_eq!(msg, "Unknown grade index 4 (scenario has 2 grades)");
    }

    #[test]
    fn test_ensure_non_negative() {
        assert!(ensure_non_negative("cost", 0.0, "Cost").is_ok());
        assert!(ensure_non_negative("cost", 12.5, "Cost").is_ok());

        let err = ensure_non_negative("cost", -1.0, "Cost").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(err.to_string().contains("Cost cannot be negative"));

        let err = ensure_non_negative("cost", f64::NAN, "Cost").unwrap_err();
        assert!(err.to_string().contains("finite"));
    }
}
