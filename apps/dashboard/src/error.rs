//! # API Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Ventes                                 │
//! │                                                                         │
//! │  Command Function  → Result<T, ApiError>                               │
//! │       │                                                                 │
//! │       ├── ValidationError ────────► VALIDATION_ERROR  (no write)       │
//! │       │     "Veuillez entrer un montant valide" / "Montant invalide"   │
//! │       │                                                                 │
//! │       ├── write already running ──► BUSY                               │
//! │       │                                                                 │
//! │       ├── DbError (logged) ───────► PERSISTENCE_ERROR                  │
//! │       │     "Erreur lors de l'enregistrement. Vérifiez la connexion."  │
//! │       │                                                                 │
//! │       └── ReportError (logged) ───► EXPORT_ERROR                       │
//! │                                                                         │
//! │  The console prints `message` inline; nothing is retried.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The underlying cause is logged where the error is converted, never
//! shown to the user.

use serde::Serialize;
use ventes_core::{CoreError, ValidationError};
use ventes_db::DbError;
use ventes_report::ReportError;

/// Inline message for an empty form.
pub const MSG_REQUIRED: &str = "Veuillez entrer un montant valide";

/// Inline message for an amount that is not a usable number.
pub const MSG_INVALID_AMOUNT: &str = "Montant invalide";

/// Inline message for a date that is not `YYYY-MM-DD`.
pub const MSG_INVALID_DATE: &str = "Date invalide";

/// Inline message when a write is rejected by the store.
pub const MSG_SAVE_FAILED: &str = "Erreur lors de l'enregistrement. Vérifiez la connexion.";

/// Inline message when a delete is rejected by the store.
pub const MSG_DELETE_FAILED: &str = "Erreur lors de la suppression";

/// Inline message when the report cannot be written.
pub const MSG_EXPORT_FAILED: &str = "Erreur lors de l'exportation du rapport";

/// Inline message while a write is outstanding.
pub const MSG_BUSY: &str = "Enregistrement en cours, veuillez patienter";

/// API error returned from dashboard commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Montant invalide"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Inline message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any write.
    ValidationError,

    /// The store rejected a write or delete.
    PersistenceError,

    /// The report could not be rendered or saved.
    ExportError,

    /// Another write is still in flight.
    Busy,

    /// Anything else.
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates the error returned while a write is in flight.
    pub fn busy() -> Self {
        ApiError::new(ErrorCode::Busy, MSG_BUSY)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Logs a failed write and turns it into the save message.
    pub fn save_failed(err: DbError) -> Self {
        tracing::error!(error = %err, "Failed to save daily sale");
        ApiError::new(ErrorCode::PersistenceError, MSG_SAVE_FAILED)
    }

    /// Logs a failed delete and turns it into the delete message.
    pub fn delete_failed(err: DbError) -> Self {
        tracing::error!(error = %err, "Failed to delete daily sale");
        ApiError::new(ErrorCode::PersistenceError, MSG_DELETE_FAILED)
    }
}

/// Converts validation errors to their inline messages.
///
/// ## Mapping
/// ```text
/// Required { .. }                   → "Veuillez entrer un montant valide"
/// InvalidFormat { field: "date" }   → "Date invalide"
/// InvalidFormat / MustNotBeNegative → "Montant invalide"
/// ```
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        let message = match &err {
            ValidationError::Required { .. } => MSG_REQUIRED,
            ValidationError::InvalidFormat { field, .. } if field == "date" => MSG_INVALID_DATE,
            ValidationError::InvalidFormat { .. } | ValidationError::MustNotBeNegative { .. } => {
                MSG_INVALID_AMOUNT
            }
        };
        tracing::debug!(error = %err, "Rejected sale input");
        ApiError::validation(message)
    }
}

/// Converts core errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::Malformed(e) => {
                tracing::warn!(
                    key = %e.key,
                    reason = %e.reason,
                    "Malformed record reached a command"
                );
                ApiError::internal(e.to_string())
            }
        }
    }
}

/// Converts report errors. Export failures are logged with their cause.
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        tracing::error!(error = %err, "Failed to export report");
        ApiError::new(ErrorCode::ExportError, MSG_EXPORT_FAILED)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for dashboard commands.
pub type ApiResult<T> = Result<T, ApiError>;
