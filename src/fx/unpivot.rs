//! Wide to long reshape against the dense calendar

use super::table::{FxRateLong, FxRateRow, RawFxRates};
use crate::error::{FxError, Result};
use crate::types::Date;
use std::sync::Arc;

/// Explode the sparse wide table into one (date, cross_currency, rate) row
/// per calendar day and currency column.
///
/// The calendar drives the join: days without a recorded row get `None` for
/// every currency, and recorded rows outside the calendar are dropped.
/// Output is date-major, currencies in the order given.
pub fn unpivot(
    calendar: &[Date],
    raw_rates: &RawFxRates,
    currency_columns: &[String],
) -> Result<FxRateLong> {
    let columns: Vec<(Arc<str>, usize)> = currency_columns
        .iter()
        .map(|column| {
            raw_rates
                .column_index(column)
                .map(|idx| (Arc::<str>::from(column.as_str()), idx))
                .ok_or_else(|| FxError::MissingColumn(column.clone()))
        })
        .collect::<Result<_>>()?;

    let mut rows = Vec::with_capacity(calendar.len() * columns.len());
    let mut observed_days = 0usize;

    for &date in calendar {
        let observed = raw_rates.row(date);
        if observed.is_some() {
            observed_days += 1;
        }

        for (label, idx) in &columns {
            let rate = observed.and_then(|rates| rates.get(*idx).copied().flatten());
            rows.push(FxRateRow::new(date, Arc::clone(label), rate));
        }
    }

    log::debug!(
        "Unpivoted {} currencies over {} days ({} days with observations)",
        columns.len(),
        calendar.len(),
        observed_days
    );

    Ok(FxRateLong::new(rows))
}
