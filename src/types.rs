//! Core types and constants

use crate::currency::CurrencyCode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar day used throughout the library
pub type Date = NaiveDate;

/// FX rate (units of base currency per unit of the quoted currency)
pub type Rate = f64;

/// Money/cash type
pub type Cash = f64;

/// Unique identifier for customers
pub type CustomerId = u64;

/// Unique identifier for accounts
pub type AccountId = u64;

/// Customer record. Columns beyond these are ignored on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub country_id: String,
}

impl Customer {
    /// Create a new customer
    pub fn new(customer_id: CustomerId, country_id: impl Into<String>) -> Self {
        Self {
            customer_id,
            country_id: country_id.into(),
        }
    }
}

/// Account record holding a balance in a single currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: AccountId,
    pub customer_id: CustomerId,
    pub currency: CurrencyCode,
    pub balance: Cash,
}

impl Account {
    /// Create a new account
    pub fn new(
        account_id: AccountId,
        customer_id: CustomerId,
        currency: CurrencyCode,
        balance: Cash,
    ) -> Self {
        Self {
            account_id,
            customer_id,
            currency,
            balance,
        }
    }
}
