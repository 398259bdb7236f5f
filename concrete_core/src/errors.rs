//! # Error Types
//!
//! Structured error types for concrete_core. Only configuration problems and
//! malformed input are errors; a section that fails a verification is an
//! ordinary result with `ok = false`.
//!
//! ## Example
//!
//! ```rust
//! use concrete_core::errors::{CalcError, CalcResult};
//!
//! fn validate_span(span_m: f64) -> CalcResult<()> {
//!     if span_m <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "span_m".to_string(),
//!             value: span_m.to_string(),
//!             reason: "Span must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for concrete_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// Design code identifier not recognized by the registry
    #[error("Unknown design code '{code}'. Supported codes: {supported}")]
    UnknownDesignCode { code: String, supported: String },

    /// Design code is known but has no implementation
    #[error("Design code '{code}' is not implemented. Supported codes: {supported}")]
    UnsupportedDesignCode { code: String, supported: String },

    /// Concrete or steel grade absent from the code's catalog
    #[error("Unknown {material} grade '{grade}' for {code}. Available grades: {available}")]
    UnknownGrade {
        material: String,
        grade: String,
        code: String,
        available: String,
    },

    /// An input value is invalid (out of range, non-finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CalcError {
    /// Create an UnknownDesignCode error
    pub fn unknown_design_code(code: impl Into<String>, supported: impl Into<String>) -> Self {
        CalcError::UnknownDesignCode {
            code: code.into(),
            supported: supported.into(),
        }
    }

    /// Create an UnsupportedDesignCode error
    pub fn unsupported_design_code(code: impl Into<String>, supported: impl Into<String>) -> Self {
        CalcError::UnsupportedDesignCode {
            code: code.into(),
            supported: supported.into(),
        }
    }

    /// Create an UnknownGrade error; `available` is joined into the message
    pub fn unknown_grade(
        material: impl Into<String>,
        grade: impl Into<String>,
        code: impl Into<String>,
        available: &[&str],
    ) -> Self {
        CalcError::UnknownGrade {
            material: material.into(),
            grade: grade.into(),
            code: code.into(),
            available: available.join(", "),
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

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
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

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Configuration errors are caller-correctable: the calculation never starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CalcError::UnknownDesignCode { .. }
                | CalcError::UnsupportedDesignCode { .. }
                | CalcError::UnknownGrade { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::UnknownDesignCode { .. } => "UNKNOWN_DESIGN_CODE",
            CalcError::UnsupportedDesignCode { .. } => "UNSUPPORTED_DESIGN_CODE",
            CalcError::UnknownGrade { .. } => "UNKNOWN_GRADE",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

/// Reject NaN, infinities and values not strictly positive.
pub(crate) fn ensure_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be a positive finite number",
        ));
    }
    Ok(())
}

/// Reject NaN, infinities and negative values.
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            "Value must be zero or a positive finite number",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("span_m", "-5.0", "Span must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::unknown_design_code("SIA262", "EC2").error_code(),
            "UNKNOWN_DESIGN_CODE"
        );
    }

    #[test]
    fn test_unknown_grade_lists_available() {
        let err = CalcError::unknown_grade("concrete", "C99/105", "EC2", &["C20/25", "C25/30"]);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("C20/25, C25/30"));
    }

    #[test]
    fn test_input_errors_are_not_configuration() {
        assert!(!CalcError::invalid_input("width_m", "0", "zero").is_configuration());
        assert!(ensure_positive("width_m", 0.0).is_err());
        assert!(ensure_positive("width_m", f64::NAN).is_err());
        assert!(ensure_non_negative("live_kn_m2", 0.0).is_ok());
    }
}
