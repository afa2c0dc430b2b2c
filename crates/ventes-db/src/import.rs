//! # Export Import
//!
//! Loads a hosted-store export (one JSON object keyed by date) into a
//! collection.
//!
//! Values are written verbatim: legacy entries keep their stored fields and
//! nothing is backfilled. A `null` value is how the hosted store marks a
//! deleted key, so it is skipped rather than written.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::repository::record::RecordRepository;

/// Outcome of one import run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entries written to the collection.
    pub imported: usize,

    /// Keys whose value was `null` (deleted upstream).
    pub skipped: Vec<String>,

    /// Keys the database refused, with the error text.
    pub failed: Vec<(String, String)>,
}

/// Upserts every non-null entry of `entries` into `collection`.
///
/// A failed entry is logged and recorded; the remaining entries are still
/// imported.
pub async fn import_entries(
    repo: &RecordRepository,
    collection: &str,
    entries: &Map<String, Value>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (key, value) in entries {
        if value.is_null() {
            debug!(key = %key, "Skipping deleted entry");
            summary.skipped.push(key.clone());
            continue;
        }

        match repo.upsert(collection, key, value).await {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to import entry");
                summary.failed.push((key.clone(), e.to_string()));
            }
        }
    }

    summary
}
