//! Single-date rate snapshot

use super::table::FxRateLong;
use crate::currency::CurrencyCode;
use crate::error::{FxError, Result};
use crate::types::{Date, Rate};
use hashbrown::{HashMap, HashSet};

/// Currency code -> rate at one date, including the base currency at 1.0
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    at_date: Date,
    base_currency: CurrencyCode,
    rates: HashMap<CurrencyCode, Rate>,
}

impl RateSnapshot {
    /// Build a snapshot from known rates; the base currency is set to 1.0
    pub fn from_rates(
        at_date: Date,
        base_currency: CurrencyCode,
        entries: impl IntoIterator<Item = (CurrencyCode, Rate)>,
    ) -> Self {
        let mut rates: HashMap<CurrencyCode, Rate> = entries.into_iter().collect();
        rates.insert(base_currency.clone(), 1.0);
        Self {
            at_date,
            base_currency,
            rates,
        }
    }

    /// Date the snapshot was taken at
    pub fn at_date(&self) -> Date {
        self.at_date
    }

    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// Rate for a currency, if one was observed on or before the snapshot date
    pub fn get(&self, currency: &CurrencyCode) -> Option<Rate> {
        self.rates.get(currency).copied()
    }

    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        self.rates.contains_key(currency)
    }

    /// Number of entries, base currency included
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Entries sorted by currency code
    pub fn sorted(&self) -> Vec<(CurrencyCode, Rate)> {
        let mut entries: Vec<(CurrencyCode, Rate)> =
            self.rates.iter().map(|(c, r)| (c.clone(), *r)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Extract the rates on `at_date` from a filled long table.
///
/// Each cross-currency label contributes the currency named by its first three
/// letters. Currencies still in their leading gap on `at_date` are absent.
/// The base currency is added with rate 1.0; labels quoting it are skipped.
pub fn snapshot(
    filled_long: &FxRateLong,
    at_date: Date,
    base_currency: &CurrencyCode,
) -> Result<RateSnapshot> {
    let mut rates: HashMap<CurrencyCode, Rate> = HashMap::new();
    let mut seen: HashSet<CurrencyCode> = HashSet::new();
    let mut seen_day = false;

    for row in filled_long.rows().iter().filter(|row| row.date == at_date) {
        seen_day = true;
        let currency = CurrencyCode::from_cross_pair(&row.cross_currency)?;

        // The base currency is pinned at 1.0
        if currency == *base_currency {
            log::warn!(
                "Ignoring {} in the {} snapshot: it quotes the base currency",
                row.cross_currency,
                at_date
            );
            continue;
        }

        if !seen.insert(currency.clone()) {
            return Err(FxError::DuplicateSnapshotCurrency {
                currency: currency.to_string(),
                date: at_date,
            });
        }

        match row.rate {
            Some(rate) => {
                rates.insert(currency, rate);
            }
            None => log::debug!("No {} rate yet on {}", row.cross_currency, at_date),
        }
    }

    if !seen_day {
        log::warn!("Snapshot date {} is not covered by the FX table", at_date);
    }

    rates.insert(base_currency.clone(), 1.0);

    Ok(RateSnapshot {
        at_date,
        base_currency: base_currency.clone(),
        rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::table::FxRateRow;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn sample_filled() -> FxRateLong {
        FxRateLong::new(vec![
            FxRateRow::new(date(2022, 5, 14), Arc::from("EURUSD"), Some(1.04)),
            FxRateRow::new(date(2022, 5, 15), Arc::from("EURUSD"), Some(1.05)),
            FxRateRow::new(date(2022, 5, 15), Arc::from("GBPUSD"), Some(1.22)),
            FxRateRow::new(date(2022, 5, 15), Arc::from("JPYUSD"), None),
        ])
    }

    #[test]
    fn test_snapshot_rates() {
        let snap = snapshot(&sample_filled(), date(2022, 5, 15), &CurrencyCode::base()).unwrap();

        assert_eq!(snap.at_date(), date(2022, 5, 15));
        assert_eq!(snap.get(&code("EUR")), Some(1.05));
        assert_eq!(snap.get(&code("GBP")), Some(1.22));
        assert_eq!(snap.get(&code("USD")), Some(1.0));
        assert_eq!(snap.len(), 3);
    }

    #[test]
    fn test_leading_gap_currency_absent() {
        let snap = snapshot(&sample_filled(), date(2022, 5, 15), &CurrencyCode::base()).unwrap();
        assert!(!snap.contains(&code("JPY")));
    }

    #[test]
    fn test_uncovered_date_only_has_base() {
        let snap = snapshot(&sample_filled(), date(2023, 1, 1), &CurrencyCode::base()).unwrap();

        assert_eq!(snap.len(), 1);
        assert_eq!(snap.get(&code("USD")), Some(1.0));
    }

    #[test]
    fn test_duplicate_currency_prefix_rejected() {
        let filled = FxRateLong::new(vec![
            FxRateRow::new(date(2022, 5, 15), Arc::from("EURUSD"), Some(1.05)),
            FxRateRow::new(date(2022, 5, 15), Arc::from("EURGBP"), Some(0.85)),
        ]);

        let result = snapshot(&filled, date(2022, 5, 15), &CurrencyCode::base());
        assert!(matches!(
            result,
            Err(FxError::DuplicateSnapshotCurrency { currency, .. }) if currency == "EUR"
        ));
    }

    #[test]
    fn test_base_currency_label_skipped() {
        let filled = FxRateLong::new(vec![
            FxRateRow::new(date(2022, 5, 15), Arc::from("USDJPY"), Some(130.0)),
            FxRateRow::new(date(2022, 5, 15), Arc::from("EURUSD"), Some(1.05)),
        ]);

        let snap = snapshot(&filled, date(2022, 5, 15), &CurrencyCode::base()).unwrap();

        assert_eq!(snap.get(&code("USD")), Some(1.0));
        assert_eq!(snap.get(&code("EUR")), Some(1.05));
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn test_invalid_label_rejected() {
        let filled = FxRateLong::new(vec![FxRateRow::new(
            date(2022, 5, 15),
            Arc::from("E1"),
            Some(0.95),
        )]);

        let result = snapshot(&filled, date(2022, 5, 15), &CurrencyCode::base());
        assert!(matches!(result, Err(FxError::InvalidCrossCurrency(_))));
    }

    #[test]
    fn test_sorted_entries() {
        let snap = snapshot(&sample_filled(), date(2022, 5, 15), &CurrencyCode::base()).unwrap();
        let codes: Vec<String> = snap.sorted().into_iter().map(|(c, _)| c.to_string()).collect();
        assert_eq!(codes, vec!["EUR", "GBP", "USD"]);
    }
}
