//! # Report Commands
//!
//! Annual PDF export of the current snapshot.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error};
use ventes_report::ReportOptions;

use crate::error::{ApiError, ApiResult};
use crate::state::SalesState;

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    /// Written report file.
    pub path: PathBuf,
}

/// Writes the report for the tracked year, stamped with `today`.
///
/// Rendering runs on the blocking pool against a copy of the snapshot, so
/// snapshots delivered meanwhile do not change the exported content.
pub async fn export_report(
    state: &SalesState,
    options: &ReportOptions,
    today: NaiveDate,
) -> ApiResult<ExportResponse> {
    let snapshot = state.with_snapshot(|s| s.clone());
    let year = state.year();
    let options = options.clone();
    debug!(year, records = snapshot.len(), "export_report command");

    let path = tokio::task::spawn_blocking(move || {
        ventes_report::export_report(&snapshot, year, today, &options)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "Report task failed");
        ApiError::internal(e.to_string())
    })??;

    Ok(ExportResponse { path })
}

// =============================================================================
// Unit Tests
// =============================================================================
