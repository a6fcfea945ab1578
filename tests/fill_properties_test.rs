//! Property tests for the forward fill

use chrono::NaiveDate;
use proptest::prelude::*;
use rusty_fxnorm::calendar;
use rusty_fxnorm::fx::{fill, pivot, unpivot, FxRateLong, RawFxRates};

const COLUMNS: [&str; 3] = ["EURUSD", "GBPUSD", "JPYUSD"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
}

/// Sparse observations: one optional cell per (day, currency)
fn sparse_cells() -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    (1usize..40).prop_flat_map(|days| {
        prop::collection::vec(
            prop::collection::vec(prop::option::weighted(0.3, 0.5f64..2.0), COLUMNS.len()),
            days,
        )
    })
}

fn build_long(cells: &[Vec<Option<f64>>]) -> (FxRateLong, Vec<String>) {
    let columns: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut raw = RawFxRates::new(columns.clone());

    for (offset, row) in cells.iter().enumerate() {
        if row.iter().any(Option::is_some) {
            let day = start() + chrono::Duration::days(offset as i64);
            raw.insert_row(day, row.clone()).unwrap();
        }
    }

    let end = start() + chrono::Duration::days(cells.len() as i64 - 1);
    let days = calendar::build(start(), end).unwrap();
    (unpivot(&days, &raw, &columns).unwrap(), columns)
}

proptest! {
    #[test]
    fn fill_is_idempotent(cells in sparse_cells()) {
        let (long, _) = build_long(&cells);
        let once = fill(&long);
        let twice = fill(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn fill_ignores_row_order(cells in sparse_cells(), seed in any::<u64>()) {
        let (long, columns) = build_long(&cells);

        let mut rows = long.clone().into_rows();
        // Deterministic permutation from the seed
        let len = rows.len();
        let mut state = seed;
        for i in (1..len).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            rows.swap(i, j);
        }
        let shuffled = FxRateLong::new(rows);

        prop_assert_eq!(pivot(&fill(&long), &columns), pivot(&fill(&shuffled), &columns));
    }

    #[test]
    fn fill_carries_last_observation(cells in sparse_cells()) {
        let (long, columns) = build_long(&cells);
        let wide = pivot(&fill(&long), &columns);

        prop_assert_eq!(wide.num_rows(), cells.len());

        for (col, name) in columns.iter().enumerate() {
            let mut last_seen = None;
            for (offset, row) in cells.iter().enumerate() {
                if row[col].is_some() {
                    last_seen = row[col];
                }
                let day = start() + chrono::Duration::days(offset as i64);
                prop_assert_eq!(wide.get(day, name), last_seen);
            }
        }
    }

    #[test]
    fn fill_preserves_row_count(cells in sparse_cells()) {
        let (long, _) = build_long(&cells);
        prop_assert_eq!(fill(&long).len(), long.len());
    }
}
