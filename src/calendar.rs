//! Dense daily calendar

use crate::error::{FxError, Result};
use crate::types::Date;

/// First day of the FX history axis (2000-01-01)
pub fn default_start_date() -> Date {
    Date::from_ymd_opt(2000, 1, 1).unwrap_or(Date::MIN)
}

/// Build every calendar day from `start` to `end`, both inclusive
pub fn build(start: Date, end: Date) -> Result<Vec<Date>> {
    if end < start {
        return Err(FxError::CalendarError(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }

    let days: Vec<Date> = start.iter_days().take_while(|day| *day <= end).collect();
    log::debug!("Built calendar {} .. {} ({} days)", start, end, days.len());

    Ok(days)
}

/// Number of days in the inclusive range, or zero when `end < start`
pub fn days_between(start: Date, end: Date) -> usize {
    if end < start {
        return 0;
    }
    (end - start).num_days() as usize + 1
}
