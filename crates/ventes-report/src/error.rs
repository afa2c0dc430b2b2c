//! # Report Error Types

use thiserror::Error;

/// Errors raised while rendering or saving a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The PDF object model rejected the document.
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The file could not be written.
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
