//! Wide and long FX rate tables

use crate::error::{FxError, Result};
use crate::types::{Date, Rate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Sparse wide FX table as recorded upstream.
///
/// One row per observed date, one nullable cell per cross-currency column.
/// The column set comes from the dataset header, not from a fixed list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFxRates {
    currency_columns: Vec<String>,
    rows: BTreeMap<Date, Vec<Option<Rate>>>,
}

impl RawFxRates {
    /// Create an empty table with the given currency columns
    pub fn new(currency_columns: Vec<String>) -> Self {
        Self {
            currency_columns,
            rows: BTreeMap::new(),
        }
    }

    /// Add the observations for one date, in column order
    pub fn insert_row(&mut self, date: Date, rates: Vec<Option<Rate>>) -> Result<()> {
        if rates.len() != self.currency_columns.len() {
            return Err(FxError::RowWidthMismatch {
                date,
                expected: self.currency_columns.len(),
                found: rates.len(),
            });
        }
        if self.rows.contains_key(&date) {
            return Err(FxError::DuplicateDate(date));
        }

        self.rows.insert(date, rates);
        Ok(())
    }

    /// Currency columns in header order
    pub fn currency_columns(&self) -> &[String] {
        &self.currency_columns
    }

    /// Index of a currency column
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.currency_columns.iter().position(|c| c == column)
    }

    /// Observations for a date, if a row was recorded
    pub fn row(&self, date: Date) -> Option<&[Option<Rate>]> {
        self.rows.get(&date).map(|rates| rates.as_slice())
    }

    /// Iterate rows in date order
    pub fn iter(&self) -> impl Iterator<Item = (&Date, &Vec<Option<Rate>>)> {
        self.rows.iter()
    }

    /// Number of recorded rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One (date, cross_currency, rate) tuple
#[derive(Debug, Clone, PartialEq)]
pub struct FxRateRow {
    pub date: Date,
    pub cross_currency: Arc<str>,
    pub rate: Option<Rate>,
}

impl FxRateRow {
    pub fn new(date: Date, cross_currency: Arc<str>, rate: Option<Rate>) -> Self {
        Self {
            date,
            cross_currency,
            rate,
        }
    }
}

/// Long FX table, before or after forward filling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FxRateLong {
    rows: Vec<FxRateRow>,
}

impl FxRateLong {
    pub fn new(rows: Vec<FxRateRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FxRateRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FxRateRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rate for a (date, cross_currency) cell; `None` if the cell is null or absent
    pub fn rate(&self, date: Date, cross_currency: &str) -> Option<Rate> {
        self.rows
            .iter()
            .find(|row| row.date == date && &*row.cross_currency == cross_currency)
            .and_then(|row| row.rate)
    }
}

/// One dense row of the wide table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRow {
    pub date: Date,
    pub rates: Vec<Option<Rate>>,
}

/// Dense wide FX table: one row per calendar day, sorted by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxRateWide {
    currency_columns: Vec<String>,
    rows: Vec<WideRow>,
}

impl FxRateWide {
    pub(crate) fn new(currency_columns: Vec<String>, rows: Vec<WideRow>) -> Self {
        Self {
            currency_columns,
            rows,
        }
    }

    pub fn currency_columns(&self) -> &[String] {
        &self.currency_columns
    }

    pub fn rows(&self) -> &[WideRow] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Rate for a (date, column) cell
    pub fn get(&self, date: Date, column: &str) -> Option<Rate> {
        let col = self.currency_columns.iter().position(|c| c == column)?;
        let idx = self.rows.binary_search_by_key(&date, |row| row.date).ok()?;
        self.rows[idx].rates.get(col).copied().flatten()
    }

    /// First and last date covered
    pub fn date_range(&self) -> Option<(Date, Date)> {
        Some((self.rows.first()?.date, self.rows.last()?.date))
    }
}
