// Property-based tests for the split rule and the aggregation views.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use chrono::NaiveDate;
use proptest::prelude::*;
use ventes_core::aggregate::{monthly_summaries, quarterly_totals, totals, weekly_buckets};
use ventes_core::types::{normalize_record, RawSaleRecord, SaleRecord, StoredField};
use ventes_core::{derive_split, WEEKLY_BUCKET_LIMIT};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        3 => 0.0..100_000.0f64,
        1 => (0u32..1_000_000).prop_map(|c| c as f64 / 100.0),
        1 => Just(0.0),
    ]
}

fn arb_date_2025() -> impl Strategy<Value = NaiveDate> {
    (0u32..365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + chrono::Days::new(offset as u64)
    })
}

fn arb_stored_field() -> impl Strategy<Value = StoredField> {
    prop_oneof![
        Just(StoredField::Absent),
        (1.0..10_000.0f64).prop_map(StoredField::Present),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<SaleRecord>> {
    prop::collection::vec((arb_date_2025(), arb_amount()), 0..80).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(date, amount)| SaleRecord::new(date, amount))
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn split_portions_sum_to_amount(amount in arb_amount()) {
        let split = derive_split(amount);
        let tolerance = 1e-9 * amount.abs().max(1.0);
        prop_assert!((split.net_amount + split.honoraire_amount - amount).abs() <= tolerance);
    }

    #[test]
    fn normalize_is_idempotent(
        amount in arb_amount(),
        net in arb_stored_field(),
        fee in arb_stored_field(),
        date in arb_date_2025(),
    ) {
        let key = date.format("%Y-%m-%d").to_string();
        let raw = RawSaleRecord { amount: Some(amount), net_amount: net, honoraire_amount: fee };

        let once = normalize_record(&key, &raw).unwrap();
        let twice = normalize_record(&key, &RawSaleRecord::from(&once)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn monthly_summaries_always_twelve(records in arb_records(), year in 2000i32..2100) {
        prop_assert_eq!(monthly_summaries(&records, year).len(), 12);
    }

    #[test]
    fn quarters_add_up_to_net_total(records in arb_records()) {
        let quarters = quarterly_totals(&monthly_summaries(&records, 2025));
        prop_assert_eq!(quarters.len(), 4);

        let by_quarter: f64 = quarters.iter().map(|q| q.value).sum();
        let net_total = totals(&records).net_total;
        prop_assert!((by_quarter - net_total).abs() <= 1e-6 * net_total.max(1.0));
    }

    #[test]
    fn weekly_buckets_never_exceed_cap(records in arb_records()) {
        prop_assert!(weekly_buckets(&records).len() <= WEEKLY_BUCKET_LIMIT);
    }

    #[test]
    fn days_with_sales_counts_records(records in arb_records()) {
        prop_assert_eq!(totals(&records).days_with_sales as usize, records.len());
    }
}
