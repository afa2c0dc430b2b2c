//! # Record Store
//!
//! Live, date-keyed sale records with whole-collection subscriptions.
//!
//! ## Snapshot Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  upsert("ventes/", "2025-01-05", raw) ──► records table                │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                                  re-read the whole collection          │
//! │                                                │                        │
//! │                                                ▼                        │
//! │                       watch::Sender<SalesSnapshot>  (one per collection)│
//! │                          │                │                             │
//! │                          ▼                ▼                             │
//! │                   Subscription      Subscription                        │
//! │                   (dashboard)       (report task)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delivery Rules
//! - A subscription yields the current snapshot first, then one snapshot
//!   per change. A slow reader skips intermediate snapshots and only sees
//!   the latest one.
//! - Snapshots are complete replacements, never diffs.
//! - Deleting a key that does not exist is a no-op: nothing is published.
//! - Dropping a [`Subscription`] unsubscribes.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};
use ventes_core::{RawSaleRecord, SalesSnapshot};

use crate::error::DbResult;
use crate::pool::Database;

// =============================================================================
// Store Trait
// =============================================================================

/// A keyed store of sale records grouped by collection.
///
/// The dashboard only talks to this trait, so a test double can stand in for
/// SQLite.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Subscribes to the full contents of a collection.
    async fn subscribe(&self, collection: &str) -> DbResult<Subscription>;

    /// Reads the collection once.
    async fn load(&self, collection: &str) -> DbResult<SalesSnapshot>;

    /// Creates or fully replaces the record at `key`.
    async fn upsert(&self, collection: &str, key: &str, value: &RawSaleRecord) -> DbResult<()>;

    /// Removes the record at `key`. A missing key is not an error.
    async fn delete(&self, collection: &str, key: &str) -> DbResult<()>;
}

// =============================================================================
// Subscription
// =============================================================================

/// Stream of snapshots for one collection.
#[derive(Debug)]
pub struct Subscription {
    rx: watch::Receiver<SalesSnapshot>,
    delivered_initial: bool,
}

impl Subscription {
    /// Wraps a watch receiver. The value it currently holds is delivered
    /// first by [`Subscription::next`].
    pub fn from_receiver(rx: watch::Receiver<SalesSnapshot>) -> Self {
        Subscription {
            rx,
            delivered_initial: false,
        }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the store behind the subscription is gone.
    pub async fn next(&mut self) -> Option<SalesSnapshot> {
        if !self.delivered_initial {
            self.delivered_initial = true;
            return Some(self.rx.borrow_and_update().clone());
        }

        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The latest snapshot, without waiting.
    pub fn current(&self) -> SalesSnapshot {
        self.rx.borrow().clone()
    }
}

// =============================================================================
// SQLite Implementation
// =============================================================================

/// [`RecordStore`] backed by the `records` table.
///
/// ## Usage
/// ```rust,ignore
/// let store = SqliteRecordStore::new(db);
/// let mut sub = store.subscribe("ventes/").await?;
///
/// while let Some(snapshot) = sub.next().await {
///     println!("{} records", snapshot.len());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    db: Database,
    channels: Arc<Mutex<HashMap<String, watch::Sender<SalesSnapshot>>>>,
}

impl SqliteRecordStore {
    /// Creates a store over an open database.
    pub fn new(db: Database) -> Self {
        SqliteRecordStore {
            db,
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    async fn read_snapshot(&self, collection: &str) -> DbResult<SalesSnapshot> {
        let rows = self.db.records().list(collection).await?;
        let snapshot = SalesSnapshot::from_entries(
            rows.iter()
                .map(|(key, value)| (key.as_str(), RawSaleRecord::from_json(value))),
        );

        for malformed in &snapshot.quarantined {
            warn!(
                collection = %collection,
                key = %malformed.key,
                reason = %malformed.reason,
                "Quarantined malformed record"
            );
        }

        Ok(snapshot)
    }

    /// Re-reads the collection and pushes it to every subscriber.
    ///
    /// The channel map stays locked for the whole reload so two writers
    /// cannot publish out of order.
    async fn publish(&self, collection: &str) {
        let channels = self.channels.lock().await;
        let Some(sender) = channels.get(collection) else {
            return;
        };

        match self.read_snapshot(collection).await {
            Ok(snapshot) => {
                debug!(
                    collection = %collection,
                    records = snapshot.len(),
                    subscribers = sender.receiver_count(),
                    "Publishing snapshot"
                );
                sender.send_replace(snapshot);
            }
            Err(e) => {
                // The write itself succeeded; subscribers catch up on the next one.
                error!(collection = %collection, error = %e, "Failed to reload collection");
            }
        }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn subscribe(&self, collection: &str) -> DbResult<Subscription> {
        let mut channels = self.channels.lock().await;

        if let Some(sender) = channels.get(collection) {
            return Ok(Subscription::from_receiver(sender.subscribe()));
        }

        let snapshot = self.read_snapshot(collection).await?;
        info!(
            collection = %collection,
            records = snapshot.len(),
            "Opened collection subscription"
        );

        let (sender, receiver) = watch::channel(snapshot);
        channels.insert(collection.to_string(), sender);
        Ok(Subscription::from_receiver(receiver))
    }

    async fn load(&self, collection: &str) -> DbResult<SalesSnapshot> {
        self.read_snapshot(collection).await
    }

    async fn upsert(&self, collection: &str, key: &str, value: &RawSaleRecord) -> DbResult<()> {
        self.db.records().upsert(collection, key, &value.to_json()).await?;
        self.publish(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> DbResult<()> {
        if self.db.records().delete(collection, key).await? {
            self.publish(collection).await;
        } else {
            debug!(collection = %collection, key = %key, "Delete of missing key ignored");
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
