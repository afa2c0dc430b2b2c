//! # Sale Commands
//!
//! Entry form actions: add, delete, look up, preview.

use chrono::NaiveDate;
use tracing::{debug, info};
use ventes_core::money::{preview_split, SplitPreview};
use ventes_core::validation::{validate_date_key, validate_sale_input};
use ventes_core::{aggregate, SaleRecord};

use crate::error::{ApiError, ApiResult};
use crate::state::SalesState;

/// Validates the entry and writes it under its date.
///
/// ## Flow
/// 1. Validation errors return before anything is written
/// 2. Rejected with `BUSY` while another write is outstanding
/// 3. `amount`, `netAmount` and `honoraireAmount` are all stored
/// 4. On success the amount field is cleared
///
/// The returned record is what the next snapshot will contain for the date;
/// the snapshot itself is only updated by the store.
pub async fn add_daily_sale(
    state: &SalesState,
    date: &str,
    amount_text: &str,
) -> ApiResult<SaleRecord> {
    debug!(date = %date, "add_daily_sale command");

    let input = validate_sale_input(date, amount_text)?;
    let _guard = state.begin_write().ok_or_else(ApiError::busy)?;

    let key = input.date.format("%Y-%m-%d").to_string();

    state
        .store()
        .upsert(state.collection(), &key, &input.to_raw())
        .await
        .map_err(ApiError::save_failed)?;

    state.set_amount_text("");
    state.select_date(input.date);

    let record = input.to_record();
    info!(
        key = %key,
        amount = record.amount,
        net = record.net_amount,
        honoraire = record.honoraire_amount,
        "Daily sale saved"
    );
    Ok(record)
}

/// Removes the record stored for `date`. A date with no record is not an
/// error.
pub async fn delete_daily_sale(state: &SalesState, date: &str) -> ApiResult<()> {
    debug!(date = %date, "delete_daily_sale command");

    let date = validate_date_key(date)?;
    let key = date.format("%Y-%m-%d").to_string();

    state
        .store()
        .delete(state.collection(), &key)
        .await
        .map_err(ApiError::delete_failed)?;

    info!(key = %key, "Daily sale deleted");
    Ok(())
}

/// Returns the record stored for `date`, if any, and selects the date.
pub fn get_sale_for_date(state: &SalesState, date: &str) -> ApiResult<Option<SaleRecord>> {
    let date = validate_date_key(date)?;
    state.select_date(date);
    Ok(sale_for(state, date))
}

fn sale_for(state: &SalesState, date: NaiveDate) -> Option<SaleRecord> {
    state.with_snapshot(|s| aggregate::find_by_date(&s.records, date).cloned())
}

/// Live split for the text typed so far.
pub fn preview(amount_text: &str) -> SplitPreview {
    preview_split(amount_text)
}

/// Whether the submit action is enabled.
pub fn can_submit(state: &SalesState, amount_text: &str) -> bool {
    !state.is_busy() && !amount_text.trim().is_empty()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::{watch, Notify};
    use ventes_core::{RawSaleRecord, SalesSnapshot};
    use ventes_db::{
        Database, DbConfig, DbError, DbResult, RecordStore, SqliteRecordStore, Subscription,
    };

    use super::*;
    use crate::error::{
        ErrorCode, MSG_DELETE_FAILED, MSG_INVALID_AMOUNT, MSG_REQUIRED, MSG_SAVE_FAILED,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
    }

    async fn sqlite_state() -> SalesState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = Arc::new(SqliteRecordStore::new(db));
        SalesState::start(store, "ventes/", 2025, today()).await.unwrap()
    }

    async fn wait_for_snapshot(mut revisions: watch::Receiver<u64>) {
        tokio::time::timeout(Duration::from_secs(1), revisions.changed())
            .await
            .unwrap()
            .unwrap();
    }

    /// Store whose writes always fail, or block until released.
    struct ScriptedStore {
        tx: watch::Sender<SalesSnapshot>,
        release: Arc<Notify>,
        block: bool,
    }

    impl ScriptedStore {
        fn failing() -> Self {
            ScriptedStore {
                tx: watch::channel(SalesSnapshot::default()).0,
                release: Arc::new(Notify::new()),
                block: false,
            }
        }

        fn blocking(release: Arc<Notify>) -> Self {
            ScriptedStore {
                tx: watch::channel(SalesSnapshot::default()).0,
                release,
                block: true,
            }
        }
    }

    #[async_trait]
    impl RecordStore for ScriptedStore {
        async fn subscribe(&self, _collection: &str) -> DbResult<Subscription> {
            Ok(Subscription::from_receiver(self.tx.subscribe()))
        }

        async fn load(&self, _collection: &str) -> DbResult<SalesSnapshot> {
            Ok(self.tx.borrow().clone())
        }

        async fn upsert(&self, _c: &str, _k: &str, _v: &RawSaleRecord) -> DbResult<()> {
            if self.block {
                self.release.notified().await;
                return Ok(());
            }
            Err(DbError::ConnectionFailed("offline".to_string()))
        }

        async fn delete(&self, _c: &str, _k: &str) -> DbResult<()> {
            Err(DbError::ConnectionFailed("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_add_derives_split_and_clears_amount() {
        let state = sqlite_state().await;
        let revisions = state.revisions();
        state.set_amount_text("100");

        let record = add_daily_sale(&state, "2025-03-15", "100").await.unwrap();
        assert!((record.net_amount - 80.0).abs() < 1e-9);
        assert!((record.honoraire_amount - 20.0).abs() < 1e-9);
        assert_eq!(state.amount_text(), "");

        wait_for_snapshot(revisions).await;
        let stored = get_sale_for_date(&state, "2025-03-15").unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_add_same_date_replaces() {
        let state = sqlite_state().await;
        let revisions = state.revisions();
        add_daily_sale(&state, "2025-03-15", "100").await.unwrap();
        wait_for_snapshot(revisions).await;

        let revisions = state.revisions();
        add_daily_sale(&state, "2025-03-15", "250").await.unwrap();

        wait_for_snapshot(revisions).await;
        assert_eq!(state.with_snapshot(|s| s.len()), 1);
        assert_eq!(
            get_sale_for_date(&state, "2025-03-15").unwrap().unwrap().amount,
            250.0
        );
    }

    #[tokio::test]
    async fn test_validation_blocks_write() {
        let state = sqlite_state().await;

        let err = add_daily_sale(&state, "2025-03-15", "").await.unwrap_err();
        assert_eq!(err.message, MSG_REQUIRED);

        let err = add_daily_sale(&state, "2025-03-15", "abc").await.unwrap_err();
        assert_eq!(err.message, MSG_INVALID_AMOUNT);

        let err = add_daily_sale(&state, "", "10").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let snapshot = state.store().load("ventes/").await.unwrap();
        assert!(snapshot.is_empty());
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_persistence_failure_leaves_state_untouched() {
        let state = SalesState::start(Arc::new(ScriptedStore::failing()), "ventes/", 2025, today())
            .await
            .unwrap();
        state.set_amount_text("100");

        let err = add_daily_sale(&state, "2025-03-15", "100").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PersistenceError);
        assert_eq!(err.message, MSG_SAVE_FAILED);
        assert_eq!(state.amount_text(), "100");
        assert!(state.with_snapshot(|s| s.is_empty()));
        assert!(!state.is_busy());

        let err = delete_daily_sale(&state, "2025-03-15").await.unwrap_err();
        assert_eq!(err.message, MSG_DELETE_FAILED);
    }

    #[tokio::test]
    async fn test_second_submit_is_busy_while_in_flight() {
        let release = Arc::new(Notify::new());
        let state = Arc::new(
            SalesState::start(
                Arc::new(ScriptedStore::blocking(release.clone())),
                "ventes/",
                2025,
                today(),
            )
            .await
            .unwrap(),
        );

        let first = {
            let state = state.clone();
            tokio::spawn(async move { add_daily_sale(&state, "2025-03-15", "100").await })
        };

        tokio::time::timeout(Duration::from_secs(1), async {
            while !state.is_busy() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(!can_submit(&state, "50"));
        let err = add_daily_sale(&state, "2025-03-16", "50").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);

        release.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert!(can_submit(&state, "50"));
    }

    #[tokio::test]
    async fn test_invalid_input_reported_before_busy() {
        let state = sqlite_state().await;
        let _held = state.begin_write().unwrap();

        let err = add_daily_sale(&state, "2025-03-15", "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, MSG_REQUIRED);

        let err = add_daily_sale(&state, "2025-03-15", "abc").await.unwrap_err();
        assert_eq!(err.message, MSG_INVALID_AMOUNT);

        let err = add_daily_sale(&state, "2025-03-15", "10").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Busy);
        assert!(state.is_busy());
    }

    #[tokio::test]
    async fn test_delete_missing_date_is_ok() {
        let state = sqlite_state().await;
        delete_daily_sale(&state, "2025-06-01").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_then_re_add_round_trips() {
        let state = sqlite_state().await;
        let revisions = state.revisions();
        let original = add_daily_sale(&state, "2025-01-05", "50").await.unwrap();
        wait_for_snapshot(revisions).await;

        let revisions = state.revisions();
        delete_daily_sale(&state, "2025-01-05").await.unwrap();
        wait_for_snapshot(revisions).await;
        assert!(get_sale_for_date(&state, "2025-01-05").unwrap().is_none());

        let revisions = state.revisions();
        add_daily_sale(&state, "2025-01-05", "50").await.unwrap();
        wait_for_snapshot(revisions).await;
        assert_eq!(get_sale_for_date(&state, "2025-01-05").unwrap(), Some(original));
    }

    #[test]
    fn test_preview() {
        let split = preview("100");
        assert!((split.net_amount - 80.0).abs() < 1e-9);
        assert_eq!(preview("").amount, 0.0);
    }

    #[tokio::test]
    async fn test_can_submit_requires_amount() {
        let state = sqlite_state().await;
        assert!(!can_submit(&state, "  "));
        assert!(can_submit(&state, "12"));
    }
}
