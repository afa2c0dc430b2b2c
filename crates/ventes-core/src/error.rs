//! # Error Types
//!
//! Domain-specific error types for ventes-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ventes-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Entry form failures                            │
//! │  └── MalformedRecord  - Stored record that cannot enter aggregates     │
//! │                                                                         │
//! │  ventes-db errors (separate crate)                                     │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  Dashboard errors (in app)                                             │
//! │  └── ApiError         - Inline message shown to the user               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → inline message         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored record was rejected on read.
    #[error(transparent)]
    Malformed(#[from] MalformedRecord),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Entry form validation errors.
///
/// These block the write locally; nothing reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (unparseable amount, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::MustNotBeNegative { field } => field,
        }
    }
}

// =============================================================================
// Malformed Record
// =============================================================================

/// A stored entry that was quarantined instead of normalized.
///
/// ## When This Occurs
/// - `amount` is missing, not a number, or not finite
/// - The key is not a canonical `YYYY-MM-DD` date
///
/// Quarantined entries never contribute to any sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("Malformed record '{key}': {reason}")]
pub struct MalformedRecord {
    /// Store key of the rejected entry.
    pub key: String,

    /// Human-readable reason.
    pub reason: String,
}

impl MalformedRecord {
    /// Creates a new MalformedRecord.
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        MalformedRecord {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount is required");

        let err = ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        };
        assert_eq!(err.to_string(), "amount must not be negative");
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn test_malformed_record_message() {
        let err = MalformedRecord::new("2025-01-10", "missing or non-numeric amount");
        assert_eq!(
            err.to_string(),
            "Malformed record '2025-01-10': missing or non-numeric amount"
        );
    }

    #[test]
    fn test_conversions_into_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "date".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));

        let core_err: CoreError = MalformedRecord::new("x", "bad key").into();
        assert!(matches!(core_err, CoreError::Malformed(_)));
    }
}
