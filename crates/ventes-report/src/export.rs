//! # Report Export
//!
//! Builds the annual report from a snapshot and saves it to disk.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;
use ventes_core::aggregate::{monthly_summaries, totals};
use ventes_core::SalesSnapshot;

use crate::error::ReportResult;
use crate::layout::{build_report, report_file_name, ReportDocument, ReportInput};
use crate::pdf::render_pdf;

/// Where and under which name reports are written.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Heading of the first page.
    pub title: String,
    /// File name prefix; the year and `.pdf` are appended.
    pub file_prefix: String,
    /// Directory receiving the file. Created if missing.
    pub output_dir: PathBuf,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            title: "FAGAFIJO".to_string(),
            file_prefix: "rapport-ventes-quotidiennes".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

/// Lays out the report for `year` from the current snapshot.
///
/// The summary and monthly table cover `year`'s months; the detail table
/// lists every record of the snapshot.
pub fn layout_report(
    snapshot: &SalesSnapshot,
    year: i32,
    title: &str,
    generated_on: NaiveDate,
) -> ReportDocument {
    let monthly = monthly_summaries(&snapshot.records, year);
    build_report(&ReportInput {
        title,
        year,
        generated_on,
        totals: totals(&snapshot.records),
        monthly: &monthly,
        records: &snapshot.records,
    })
}

/// Renders the report and writes `<prefix>-<year>.pdf` into the output
/// directory. Returns the path of the written file.
pub fn export_report(
    snapshot: &SalesSnapshot,
    year: i32,
    generated_on: NaiveDate,
    options: &ReportOptions,
) -> ReportResult<PathBuf> {
    let document = layout_report(snapshot, year, &options.title, generated_on);
    let bytes = render_pdf(&document)?;

    let path = output_path(&options.output_dir, &options.file_prefix, year);
    fs::create_dir_all(&options.output_dir)?;
    fs::write(&path, &bytes)?;

    info!(
        path = %path.display(),
        pages = document.pages.len(),
        records = snapshot.len(),
        "Exported annual report"
    );
    Ok(path)
}

fn output_path(dir: &Path, prefix: &str, year: i32) -> PathBuf {
    dir.join(report_file_name(prefix, year))
}
