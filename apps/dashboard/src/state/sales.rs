//! # Sales State
//!
//! The application-owned view of the record store.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RecordStore::subscribe(collection)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  listener task ── replaces ──► snapshot (RwLock<SalesSnapshot>)        │
//! │                                   ▲                                     │
//! │                                   │ read                                │
//! │  commands ─── write ──► store ────┘ (only via the next snapshot)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands never patch the snapshot themselves. A successful write shows
//! up once the store publishes it; a failed one leaves the snapshot as it
//! was.
//!
//! ## In-Flight Flag
//! One write at a time per client. [`SalesState::begin_write`] hands out a
//! guard; a second caller gets `None` until the guard is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::NaiveDate;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use ventes_core::SalesSnapshot;
use ventes_db::{DbResult, RecordStore};

/// Shared application state for the dashboard.
pub struct SalesState {
    store: Arc<dyn RecordStore>,
    collection: String,
    year: i32,
    snapshot: Arc<RwLock<SalesSnapshot>>,
    revision: watch::Receiver<u64>,
    selected_date: Mutex<NaiveDate>,
    amount_text: Mutex<String>,
    in_flight: AtomicBool,
    listener: JoinHandle<()>,
}

impl SalesState {
    /// Subscribes to `collection` and waits for the first snapshot.
    ///
    /// The returned state already mirrors the store; later snapshots are
    /// applied by a background task until the state is dropped.
    pub async fn start(
        store: Arc<dyn RecordStore>,
        collection: impl Into<String>,
        year: i32,
        today: NaiveDate,
    ) -> DbResult<Self> {
        let collection = collection.into();
        let mut subscription = store.subscribe(&collection).await?;
        let initial = subscription.next().await.unwrap_or_default();

        info!(
            collection = %collection,
            records = initial.len(),
            quarantined = initial.quarantined.len(),
            "Sales state ready"
        );

        let snapshot = Arc::new(RwLock::new(initial));
        let (revision_tx, revision) = watch::channel(0u64);

        let mirror = Arc::clone(&snapshot);
        let listener = tokio::spawn(async move {
            while let Some(next) = subscription.next().await {
                debug!(records = next.len(), "Applying snapshot");
                *mirror.write().unwrap_or_else(PoisonError::into_inner) = next;
                revision_tx.send_modify(|r| *r += 1);
            }
            debug!("Snapshot stream closed");
        });

        Ok(SalesState {
            store,
            collection,
            year,
            snapshot,
            revision,
            selected_date: Mutex::new(today),
            amount_text: Mutex::new(String::new()),
            in_flight: AtomicBool::new(false),
            listener,
        })
    }

    /// The record store behind this state.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Collection path of the tracked records.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Year of the monthly and quarterly views.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Runs `f` against the latest snapshot.
    pub fn with_snapshot<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SalesSnapshot) -> R,
    {
        let snapshot = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        f(&snapshot)
    }

    /// Receiver bumped once per snapshot applied after this call.
    pub fn revisions(&self) -> watch::Receiver<u64> {
        let mut rx = self.revision.clone();
        rx.borrow_and_update();
        rx
    }

    // =========================================================================
    // Entry form
    // =========================================================================

    /// Date currently selected in the entry form.
    pub fn selected_date(&self) -> NaiveDate {
        *self.selected_date.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Changes the selected date.
    pub fn select_date(&self, date: NaiveDate) {
        *self.selected_date.lock().unwrap_or_else(PoisonError::into_inner) = date;
    }

    /// Text currently in the amount field.
    pub fn amount_text(&self) -> String {
        self.amount_text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the amount field text.
    pub fn set_amount_text(&self, text: impl Into<String>) {
        *self.amount_text.lock().unwrap_or_else(PoisonError::into_inner) = text.into();
    }

    // =========================================================================
    // In-flight flag
    // =========================================================================

    /// True while a write is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claims the in-flight flag, or `None` when a write is already running.
    pub fn begin_write(&self) -> Option<WriteGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| WriteGuard { flag: &self.in_flight })
    }
}

impl Drop for SalesState {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

impl std::fmt::Debug for SalesState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesState")
            .field("collection", &self.collection)
            .field("year", &self.year)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag when dropped.
#[derive(Debug)]
pub struct WriteGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
