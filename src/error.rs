//! Custom error types for Spendwise
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::DateRangeError;

/// The main error type for Spendwise operations
#[derive(Error, Debug)]
pub enum SpendwiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// End date before start date, or an invalid month/year
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// A budget for the same category already covers part of the requested interval
    #[error(
        "An overlapping budget exists for category '{category}' between {start} and {end} ({conflicting_id})"
    )]
    OverlapConflict {
        category: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        conflicting_id: String,
    },

    /// Entity not found (or not owned by the requesting user)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl SpendwiseError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invalid range error
    pub fn is_invalid_range(&self) -> bool {
        matches!(self, Self::InvalidRange(_))
    }

    /// Check if this is an overlapping budget error
    pub fn is_overlap(&self) -> bool {
        matches!(self, Self::OverlapConflict { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SpendwiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SpendwiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<DateRangeError> for SpendwiseError {
    fn from(err: DateRangeError) -> Self {
        match err {
            DateRangeError::InvalidFormat(_) => Self::Validation(err.to_string()),
            _ => Self::InvalidRange(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for SpendwiseError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for SpendwiseError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for Spendwise operations
pub type SpendwiseResult<T> = Result<T, SpendwiseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_error_display() {
        let err = SpendwiseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SpendwiseError::budget_not_found("bud-1234abcd");
        assert_eq!(err.to_string(), "Budget not found: bud-1234abcd");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_overlap_error() {
        let err = SpendwiseError::OverlapConflict {
            category: "Food".into(),
            start: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
            conflicting_id: "bud-00000000".into(),
        };
        assert_eq!(
            err.to_string(),
            "An overlapping budget exists for category 'Food' between 2024-01-31 and 2024-02-15 (bud-00000000)"
        );
        assert!(err.is_overlap());
    }

    #[test]
    fn test_from_date_range_error() {
        let err: SpendwiseError = DateRangeError::InvalidMonth(13).into();
        assert!(err.is_invalid_range());

        let err: SpendwiseError = DateRangeError::InvalidFormat("soon".into()).into();
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SpendwiseError = io_err.into();
        assert!(matches!(err, SpendwiseError::Io(_)));
    }
}
