//! Error types for rusty_fxnorm

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the FX normalization pipeline
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Calendar error: {0}")]
    CalendarError(String),

    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Duplicate FX observation row for date {0}")]
    DuplicateDate(NaiveDate),

    #[error("FX row for {date} has {found} rate cells, expected {expected}")]
    RowWidthMismatch {
        date: NaiveDate,
        expected: usize,
        found: usize,
    },

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid cross-currency label: {0}")]
    InvalidCrossCurrency(String),

    #[error("Currency {currency} appears more than once in the snapshot for {date}")]
    DuplicateSnapshotCurrency { currency: String, date: NaiveDate },

    #[error("No {currency} rate on {date} for account {account_id}")]
    MissingCurrencyRate {
        account_id: u64,
        currency: String,
        date: NaiveDate,
    },

    #[error("Cannot convert balance of customer {customer_id} to {currency}: {reason}")]
    LocalConversionFailure {
        customer_id: u64,
        currency: String,
        reason: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for rusty_fxnorm operations
pub type Result<T> = std::result::Result<T, FxError>;
