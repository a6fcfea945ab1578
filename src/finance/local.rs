//! Base-currency totals converted into each customer's local currency

use super::balance::CustomerBalanceBase;
use super::money::round_money;
use crate::config::RoundingMode;
use crate::currency::{CurrencyCode, LocalCurrencyMapper};
use crate::error::{FxError, Result};
use crate::fx::RateSnapshot;
use crate::types::{Cash, Customer, CustomerId};
use serde::Serialize;

/// One output row: `(customer_id, local_currency, tot_balance)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalBalanceRow {
    pub customer_id: CustomerId,
    pub local_currency: CurrencyCode,
    pub tot_balance: Option<Cash>,
}

/// Local-currency balances, one row per customer, ordered by customer id
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct CustomerBalanceLocal {
    rows: Vec<LocalBalanceRow>,
}

impl CustomerBalanceLocal {
    pub fn rows(&self) -> &[LocalBalanceRow] {
        &self.rows
    }

    pub fn get(&self, customer_id: CustomerId) -> Option<&LocalBalanceRow> {
        self.rows
            .binary_search_by_key(&customer_id, |row| row.customer_id)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Divides base-currency totals by the local currency's rate
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBalanceConverter {
    rounding: RoundingMode,
}

impl LocalBalanceConverter {
    pub fn new(rounding: RoundingMode) -> Self {
        Self { rounding }
    }

    /// Convert one customer's base total into `local_currency`.
    ///
    /// The base currency divides by 1.0. A missing, zero or non-finite rate for
    /// any other currency is a reporting defect and fails with
    /// [`FxError::LocalConversionFailure`]. A `None` base total stays `None`.
    pub fn to_local(
        &self,
        customer_id: CustomerId,
        local_currency: &CurrencyCode,
        base_total: Option<Cash>,
        snapshot: &RateSnapshot,
    ) -> Result<Option<Cash>> {
        let divisor = if local_currency == snapshot.base_currency() {
            1.0
        } else {
            match snapshot.get(local_currency) {
                None => {
                    return Err(FxError::LocalConversionFailure {
                        customer_id,
                        currency: local_currency.to_string(),
                        reason: format!("no rate on {}", snapshot.at_date()),
                    })
                }
                Some(rate) if rate == 0.0 || !rate.is_finite() => {
                    return Err(FxError::LocalConversionFailure {
                        customer_id,
                        currency: local_currency.to_string(),
                        reason: format!("rate on {} is {}", snapshot.at_date(), rate),
                    })
                }
                Some(rate) => rate,
            }
        };

        base_total
            .map(|total| round_money(total / divisor, self.rounding))
            .transpose()
    }

    /// Convert every customer's base total into their local currency.
    ///
    /// Driven by the customer table: customers without accounts still get a
    /// row, with a `None` balance.
    pub fn convert(
        &self,
        customers: &[Customer],
        base: &CustomerBalanceBase,
        snapshot: &RateSnapshot,
        mapper: &LocalCurrencyMapper,
    ) -> Result<CustomerBalanceLocal> {
        let mut rows = Vec::with_capacity(customers.len());

        for customer in customers {
            let local_currency = mapper.local_currency(&customer.country_id);
            let base_total = base.get(customer.customer_id).flatten();
            let tot_balance =
                self.to_local(customer.customer_id, &local_currency, base_total, snapshot)?;

            rows.push(LocalBalanceRow {
                customer_id: customer.customer_id,
                local_currency,
                tot_balance,
            });
        }

        rows.sort_by_key(|row| row.customer_id);
        log::info!("Converted {} customers into local currency", rows.len());

        Ok(CustomerBalanceLocal { rows })
    }
}
