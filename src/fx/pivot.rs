//! Long to wide reshape

use super::table::{FxRateLong, FxRateWide, WideRow};
use crate::types::{Date, Rate};
use hashbrown::HashMap;
use std::collections::BTreeMap;

/// Pivot a filled long table back to one row per date and one column per
/// currency, in the order of `currency_columns`.
///
/// After filling there is exactly one value per (date, currency) cell, so the
/// reducer only has to be idempotent; `min` is used. Rows for currencies not
/// listed are ignored. Output is sorted by date.
pub fn pivot(filled_long: &FxRateLong, currency_columns: &[String]) -> FxRateWide {
    let column_index: HashMap<&str, usize> = currency_columns
        .iter()
        .enumerate()
        .map(|(idx, column)| (column.as_str(), idx))
        .collect();

    let mut grouped: BTreeMap<Date, Vec<Option<Rate>>> = BTreeMap::new();
    let mut ignored = 0usize;

    for row in filled_long.rows() {
        let Some(&col) = column_index.get(&*row.cross_currency) else {
            ignored += 1;
            continue;
        };

        let cells = grouped
            .entry(row.date)
            .or_insert_with(|| vec![None; currency_columns.len()]);
        cells[col] = min_rate(cells[col], row.rate);
    }

    if ignored > 0 {
        log::debug!("Pivot ignored {} rows outside the requested columns", ignored);
    }

    let rows = grouped
        .into_iter()
        .map(|(date, rates)| WideRow { date, rates })
        .collect();

    FxRateWide::new(currency_columns.to_vec(), rows)
}

fn min_rate(current: Option<Rate>, candidate: Option<Rate>) -> Option<Rate> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
