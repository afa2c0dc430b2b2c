//! # Dashboard Commands
//!
//! Read-only views. Each call recomputes from the latest snapshot.

use ventes_core::Dashboard;

use crate::state::SalesState;

/// Computes every dashboard view for the tracked year and selected date.
pub fn get_dashboard(state: &SalesState) -> Dashboard {
    let selected = state.selected_date();
    state.with_snapshot(|snapshot| Dashboard::compute(snapshot, state.year(), selected))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use ventes_core::RawSaleRecord;
    use ventes_db::{Database, DbConfig, RecordStore, SqliteRecordStore};

    use super::*;

    async fn seeded_state(entries: &[(&str, f64)]) -> SalesState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = Arc::new(SqliteRecordStore::new(db));
        for (key, amount) in entries {
            store
                .upsert("ventes/", key, &RawSaleRecord::derived(*amount))
                .await
                .unwrap();
        }
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        SalesState::start(store, "ventes/", 2025, today).await.unwrap()
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let state = seeded_state(&[]).await;
        let dashboard = get_dashboard(&state);

        assert_eq!(dashboard.year, 2025);
        assert_eq!(dashboard.totals.days_with_sales, 0);
        assert_eq!(dashboard.monthly.len(), 12);
        assert!(dashboard.weekly.is_empty());
        assert!(!dashboard.has_quarterly_data);
        assert!(dashboard.recent.is_empty());
        assert!(dashboard.selected_sale.is_none());
    }

    #[tokio::test]
    async fn test_dashboard_views() {
        let state = seeded_state(&[
            ("2025-01-05", 100.0),
            ("2025-01-20", 50.0),
            ("2025-03-15", 200.0),
            ("2024-12-31", 40.0),
        ])
        .await;
        let dashboard = get_dashboard(&state);

        assert_eq!(dashboard.totals.days_with_sales, 4);
        assert!((dashboard.totals.total - 390.0).abs() < 1e-9);

        let january = &dashboard.monthly[0];
        assert_eq!(january.days, 2);
        assert!((january.total - 150.0).abs() < 1e-9);
        assert!((dashboard.monthly[2].net_total - 160.0).abs() < 1e-9);

        assert!(dashboard.has_quarterly_data);
        assert!((dashboard.quarterly[0].value - 280.0).abs() < 1e-9);
        assert!((dashboard.quarterly[0].percent - 100.0).abs() < 1e-9);

        assert_eq!(dashboard.selected_sale.unwrap().amount, 200.0);
    }

    #[tokio::test]
    async fn test_selected_date_follows_state() {
        let state = seeded_state(&[("2025-01-05", 100.0)]).await;
        state.select_date(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());

        let dashboard = get_dashboard(&state);
        assert_eq!(dashboard.selected_date.to_string(), "2025-01-05");
        assert_eq!(dashboard.selected_sale.unwrap().amount, 100.0);
    }
}
