//! CSV loaders for customers, accounts and the raw FX table

use crate::error::{FxError, Result};
use crate::fx::RawFxRates;
use crate::types::{Account, Customer, Date, Rate};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Layout of the raw FX CSV file
#[derive(Debug, Clone)]
pub struct FxCsvFormat {
    /// Header of the date column; every other column is a currency column
    pub date_column: String,
    /// chrono format string for the date column
    pub date_format: String,
}

impl Default for FxCsvFormat {
    fn default() -> Self {
        Self {
            date_column: "fx_date".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl FxCsvFormat {
    pub fn with_date_column(date_column: impl Into<String>) -> Self {
        Self {
            date_column: date_column.into(),
            ..Self::default()
        }
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| FxError::DataError(format!("Failed to open {}: {}", path.display(), e)))
}

fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut records = Vec::new();

    for result in rdr.deserialize() {
        records.push(result?);
    }

    Ok(records)
}

/// Read customers; columns other than `customer_id` and `country_id` are ignored
pub fn read_customers<R: Read>(reader: R) -> Result<Vec<Customer>> {
    let customers: Vec<Customer> = read_records(reader)?;
    log::debug!("Read {} customers", customers.len());
    Ok(customers)
}

pub fn load_customers(path: &Path) -> Result<Vec<Customer>> {
    read_customers(open(path)?)
}

/// Read accounts (`account_id,customer_id,currency,balance`)
pub fn read_accounts<R: Read>(reader: R) -> Result<Vec<Account>> {
    let accounts: Vec<Account> = read_records(reader)?;

    if let Some(bad) = accounts.iter().find(|a| !a.balance.is_finite()) {
        return Err(FxError::ParseError(format!(
            "Invalid balance {} for account {}",
            bad.balance, bad.account_id
        )));
    }

    log::debug!("Read {} accounts", accounts.len());
    Ok(accounts)
}

pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    read_accounts(open(path)?)
}

/// Read the sparse wide FX table.
///
/// The currency columns are whatever headers remain besides the date column,
/// in header order. Empty, `null` and `NA` cells are missing observations.
pub fn read_fx_rates<R: Read>(reader: R, format: &FxCsvFormat) -> Result<RawFxRates> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| FxError::DataError(format!("Failed to read headers: {}", e)))?
        .clone();

    let date_idx = find_column(&headers, &format.date_column)?;
    let currency_columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != date_idx)
        .map(|(idx, name)| (idx, name.to_string()))
        .collect();

    let mut rates =
        RawFxRates::new(currency_columns.iter().map(|(_, name)| name.clone()).collect());

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        // header is line 1
        let line = line + 2;

        let date_str = record
            .get(date_idx)
            .ok_or_else(|| FxError::DataError(format!("Missing date at line {}", line)))?;
        let date = Date::parse_from_str(date_str, &format.date_format).map_err(|_| {
            FxError::ParseError(format!("Invalid date '{}' at line {}", date_str, line))
        })?;

        let cells = currency_columns
            .iter()
            .map(|(idx, name)| parse_rate(record.get(*idx).unwrap_or(""), name, line))
            .collect::<Result<Vec<_>>>()?;

        rates.insert_row(date, cells)?;
    }

    log::debug!(
        "Read {} FX rows with {} currency columns",
        rates.num_rows(),
        rates.currency_columns().len()
    );

    Ok(rates)
}

pub fn load_fx_rates(path: &Path, format: &FxCsvFormat) -> Result<RawFxRates> {
    read_fx_rates(open(path)?, format)
}

fn parse_rate(cell: &str, column: &str, line: usize) -> Result<Option<Rate>> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("null") || cell.eq_ignore_ascii_case("na") {
        return Ok(None);
    }

    let invalid = || {
        FxError::ParseError(format!(
            "Invalid rate '{}' in column {} at line {}",
            cell, column, line
        ))
    };

    // `f64::from_str` accepts NaN and infinities; neither is an observation
    match cell.parse::<Rate>() {
        Ok(rate) if rate.is_finite() => Ok(Some(rate)),
        _ => Err(invalid()),
    }
}

/// Find column index by name
fn find_column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| FxError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_read_fx_rates() {
        let csv = "fx_date,EURUSD,GBPUSD\n2022-01-01,1.10,\n2022-01-05,1.12,1.35\n";
        let raw = read_fx_rates(csv.as_bytes(), &FxCsvFormat::default()).unwrap();

        assert_eq!(raw.currency_columns(), &["EURUSD".to_string(), "GBPUSD".to_string()]);
        assert_eq!(raw.num_rows(), 2);
        assert_eq!(raw.row(date(2022, 1, 1)), Some(&[Some(1.10), None][..]));
        assert_eq!(raw.row(date(2022, 1, 5)), Some(&[Some(1.12), Some(1.35)][..]));
    }

    #[test]
    fn test_date_column_anywhere() {
        let csv = "CHFUSD,FX_DATE,JPYUSD\n1.01,2022-01-01,NA\n";
        let raw = read_fx_rates(csv.as_bytes(), &FxCsvFormat::default()).unwrap();

        assert_eq!(raw.currency_columns(), &["CHFUSD".to_string(), "JPYUSD".to_string()]);
        assert_eq!(raw.row(date(2022, 1, 1)), Some(&[Some(1.01), None][..]));
    }

    #[test]
    fn test_missing_date_column() {
        let csv = "date,EURUSD\n2022-01-01,1.1\n";
        let result = read_fx_rates(csv.as_bytes(), &FxCsvFormat::default());
        assert!(matches!(result, Err(FxError::MissingColumn(_))));

        let raw = read_fx_rates(csv.as_bytes(), &FxCsvFormat::with_date_column("date")).unwrap();
        assert_eq!(raw.num_rows(), 1);
    }

    #[test]
    fn test_bad_cells_abort() {
        let bad_date = "fx_date,EURUSD\n2022-13-01,1.1\n";
        assert!(matches!(
            read_fx_rates(bad_date.as_bytes(), &FxCsvFormat::default()),
            Err(FxError::ParseError(_))
        ));

        let bad_rate = "fx_date,EURUSD\n2022-01-01,abc\n";
        assert!(matches!(
            read_fx_rates(bad_rate.as_bytes(), &FxCsvFormat::default()),
            Err(FxError::ParseError(_))
        ));

        let duplicate = "fx_date,EURUSD\n2022-01-01,1.1\n2022-01-01,1.2\n";
        assert!(matches!(
            read_fx_rates(duplicate.as_bytes(), &FxCsvFormat::default()),
            Err(FxError::DuplicateDate(_))
        ));

        let ragged = "fx_date,EURUSD\n2022-01-01,1.1,9\n";
        assert!(read_fx_rates(ragged.as_bytes(), &FxCsvFormat::default()).is_err());
    }

    #[test]
    fn test_non_finite_rates_rejected() {
        for cell in ["NaN", "nan", "inf", "-inf", "infinity"] {
            let csv = format!("fx_date,EURUSD\n2022-01-01,{}\n", cell);
            let result = read_fx_rates(csv.as_bytes(), &FxCsvFormat::default());
            assert!(matches!(result, Err(FxError::ParseError(_))), "accepted '{}'", cell);
        }
    }

    #[test]
    fn test_read_customers_ignores_extra_columns() {
        let csv = "customer_id,name,country_id\n1,Ada,IT\n2,Bob,JP\n";
        let customers = read_customers(csv.as_bytes()).unwrap();

        assert_eq!(customers, vec![Customer::new(1, "IT"), Customer::new(2, "JP")]);
    }

    #[test]
    fn test_read_accounts() {
        let csv = "account_id,customer_id,currency,balance\n10,1,eur,100.5\n11,1,USD,-3\n";
        let accounts = read_accounts(csv.as_bytes()).unwrap();

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].currency.as_str(), "EUR");
        assert_eq!(accounts[0].balance, 100.5);
        assert_eq!(accounts[1].balance, -3.0);
    }

    #[test]
    fn test_read_accounts_non_finite_balance() {
        let csv = "account_id,customer_id,currency,balance\n10,1,EUR,NaN\n";
        assert!(matches!(read_accounts(csv.as_bytes()), Err(FxError::ParseError(_))));
    }

    #[test]
    fn test_read_accounts_invalid_currency() {
        let csv = "account_id,customer_id,currency,balance\n10,1,EURO,1\n";
        assert!(matches!(read_accounts(csv.as_bytes()), Err(FxError::CsvError(_))));
    }
}
