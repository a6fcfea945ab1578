//! Per-customer totals in the base currency

use super::money::round_money;
use crate::config::{MissingRatePolicy, RoundingMode};
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use crate::fx::RateSnapshot;
use crate::types::{Account, AccountId, Cash, CustomerId};
use serde::Serialize;
use std::collections::BTreeMap;

/// An account whose currency had no rate in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingRate {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    pub currency: CurrencyCode,
}

/// One output row: `(customer_id, tot_base_balance)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseBalanceRow {
    pub customer_id: CustomerId,
    pub tot_base_balance: Option<Cash>,
}

/// Customer id -> total balance in the base currency, rounded to 2 dp.
///
/// A `None` total means a rate was missing (see [`MissingRatePolicy`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerBalanceBase {
    totals: BTreeMap<CustomerId, Option<Cash>>,
    missing_rates: Vec<MissingRate>,
}

impl CustomerBalanceBase {
    /// Total for a customer; outer `None` if the customer has no accounts
    pub fn get(&self, customer_id: CustomerId) -> Option<Option<Cash>> {
        self.totals.get(&customer_id).copied()
    }

    /// Accounts that could not be converted
    pub fn missing_rates(&self) -> &[MissingRate] {
        &self.missing_rates
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Iterate totals ordered by customer id
    pub fn iter(&self) -> impl Iterator<Item = (CustomerId, Option<Cash>)> + '_ {
        self.totals.iter().map(|(id, total)| (*id, *total))
    }

    /// Rows ordered by customer id
    pub fn rows(&self) -> Vec<BaseBalanceRow> {
        self.iter()
            .map(|(customer_id, tot_base_balance)| BaseBalanceRow {
                customer_id,
                tot_base_balance,
            })
            .collect()
    }
}

/// Running sum for one customer
#[derive(Debug, Default)]
struct Accumulator {
    sum: Cash,
    converted: usize,
    missing: usize,
}

/// Converts account balances into the base currency and sums them per customer
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceConverter {
    policy: MissingRatePolicy,
    rounding: RoundingMode,
}

impl BalanceConverter {
    pub fn new(policy: MissingRatePolicy, rounding: RoundingMode) -> Self {
        Self { policy, rounding }
    }

    /// Left join accounts to the snapshot, convert, group by customer and sum.
    ///
    /// The sum is rounded once per customer, after every account has been
    /// added. Each distinct customer in `accounts` gets exactly one entry.
    pub fn to_base(
        &self,
        accounts: &[Account],
        snapshot: &RateSnapshot,
    ) -> Result<CustomerBalanceBase> {
        let mut groups: BTreeMap<CustomerId, Accumulator> = BTreeMap::new();
        let mut missing_rates = Vec::new();

        for account in accounts {
            let group = groups.entry(account.customer_id).or_default();

            match snapshot.get(&account.currency) {
                Some(rate) => {
                    group.sum += account.balance * rate;
                    group.converted += 1;
                }
                None => {
                    if self.policy == MissingRatePolicy::Fail {
                        return Err(FxError::MissingCurrencyRate {
                            account_id: account.account_id,
                            currency: account.currency.to_string(),
                            date: snapshot.at_date(),
                        });
                    }

                    log::warn!(
                        "No {} rate on {} for account {} (customer {})",
                        account.currency,
                        snapshot.at_date(),
                        account.account_id,
                        account.customer_id
                    );
                    group.missing += 1;
                    missing_rates.push(MissingRate {
                        account_id: account.account_id,
                        customer_id: account.customer_id,
                        currency: account.currency.clone(),
                    });
                }
            }
        }

        let mut totals = BTreeMap::new();
        for (customer_id, group) in groups {
            let total = match self.policy {
                MissingRatePolicy::Propagate if group.missing > 0 => None,
                _ if group.converted == 0 => None,
                _ => Some(round_money(group.sum, self.rounding)?),
            };
            totals.insert(customer_id, total);
        }

        log::info!(
            "Converted {} accounts into {} customer totals ({} missing rates)",
            accounts.len(),
            totals.len(),
            missing_rates.len()
        );

        Ok(CustomerBalanceBase {
            totals,
            missing_rates,
        })
    }
}
