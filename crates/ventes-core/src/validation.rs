//! # Validation Module
//!
//! Entry form validation for the daily sale input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation                                                 │
//! │  └── Submit disabled while the amount field is empty                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command (Rust)                                               │
//! │  └── THIS MODULE: required fields, numeric amount, date key            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Read path                                                    │
//! │  └── normalize_record quarantines anything the store still holds       │
//! │      that cannot be summed                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ventes_core::validation::validate_sale_input;
//!
//! let input = validate_sale_input("2025-03-15", "100").unwrap();
//! assert_eq!(input.amount, 100.0);
//! assert!(validate_sale_input("2025-03-15", "").is_err());
//! ```

use chrono::NaiveDate;

use crate::calendar::parse_date_key;
use crate::error::ValidationError;
use crate::types::{RawSaleRecord, SaleRecord};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A validated entry, ready to be written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleInput {
    /// Record key.
    pub date: NaiveDate,

    /// Gross amount.
    pub amount: f64,
}

impl SaleInput {
    /// Value to persist: amount plus both derived portions.
    pub fn to_raw(&self) -> RawSaleRecord {
        RawSaleRecord::derived(self.amount)
    }

    /// The record this entry will read back as.
    pub fn to_record(&self) -> SaleRecord {
        SaleRecord::new(self.date, self.amount)
    }
}

/// Validates a date key from the date selector.
///
/// ## Rules
/// - Must not be empty
/// - Must be a real `YYYY-MM-DD` date
pub fn validate_date_key(date: &str) -> ValidationResult<NaiveDate> {
    let date = date.trim();

    if date.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    parse_date_key(date).ok_or_else(|| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: "expected YYYY-MM-DD".to_string(),
    })
}

/// Validates the amount text field.
///
/// ## Rules
/// - Must not be empty
/// - Must parse as a finite number (`"NaN"` and `"inf"` are rejected)
/// - Must not be negative
///
/// ## Example
/// ```rust
/// use ventes_core::validation::validate_amount;
///
/// assert_eq!(validate_amount(" 12.5 ").unwrap(), 12.5);
/// assert!(validate_amount("douze").is_err());
/// assert!(validate_amount("-3").is_err());
/// ```
pub fn validate_amount(amount: &str) -> ValidationResult<f64> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }

    let value = amount
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: "must be a number".to_string(),
        })?;

    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "amount".to_string(),
        });
    }

    Ok(value)
}

/// Validates the whole entry form.
///
/// Both fields are checked for emptiness before anything is parsed, so an
/// empty form always reports `Required`.
pub fn validate_sale_input(date: &str, amount: &str) -> ValidationResult<SaleInput> {
    if amount.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "amount".to_string(),
        });
    }
    if date.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    Ok(SaleInput {
        date: validate_date_key(date)?,
        amount: validate_amount(amount)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
