//! Monetary rounding

use crate::config::RoundingMode;
use crate::error::{FxError, Result};
use crate::types::Cash;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on reported totals
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round a monetary amount to two decimal places.
///
/// The amount goes through `Decimal` so midpoints are judged on the decimal
/// value as written (2.675 is a midpoint), not on its binary approximation.
///
/// Finite amounts `Decimal` cannot hold (magnitudes beyond about 7.9e28) are
/// returned unchanged: an `f64` that large has no fractional digits left. NaN and infinities
/// are rejected with [`FxError::InvalidAmount`].
pub fn round_money(amount: Cash, mode: RoundingMode) -> Result<Cash> {
    if !amount.is_finite() {
        return Err(FxError::InvalidAmount(format!("{} is not a finite amount", amount)));
    }

    let Some(decimal) = Decimal::from_f64(amount) else {
        log::debug!("{} is outside the decimal range, left unrounded", amount);
        return Ok(amount);
    };

    let strategy = match mode {
        RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
    };

    decimal
        .round_dp_with_strategy(MONEY_DECIMAL_PLACES, strategy)
        .to_f64()
        .ok_or_else(|| FxError::InvalidAmount(format!("{} cannot be converted back", decimal)))
}
