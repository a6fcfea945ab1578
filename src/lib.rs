//! # rusty_fxnorm
//!
//! Normalizes a sparse, wide table of foreign-exchange observations into a
//! dense daily series, then uses the rates on a reference date to convert
//! account balances into the base currency (USD) and into each customer's
//! local currency.
//!
//! ## Example
//!
//! ```rust
//! use rusty_fxnorm::prelude::*;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2022, 5, 15).unwrap();
//!
//! let mut fx_rates = RawFxRates::new(vec!["EURUSD".to_string()]);
//! fx_rates.insert_row(NaiveDate::from_ymd_opt(2022, 5, 2).unwrap(), vec![Some(0.90)]).unwrap();
//!
//! let eur = CurrencyCode::parse("EUR").unwrap();
//! let inputs = PipelineInputs {
//!     customers: vec![Customer::new(1, "FR")],
//!     accounts: vec![Account::new(1, 1, eur, 100.0)],
//!     fx_rates,
//! };
//!
//! let output = FxPipeline::default().run(&inputs, today).unwrap();
//! assert_eq!(output.customer_balance_base.get(1), Some(Some(90.0)));
//! assert_eq!(output.customer_balance_local.get(1).unwrap().tot_balance, Some(100.0));
//! ```

pub mod calendar;
pub mod config;
pub mod currency;
pub mod data;
pub mod engine;
pub mod error;
pub mod finance;
pub mod fx;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::config::{MissingRatePolicy, PipelineConfig, RoundingMode};
    pub use crate::currency::{local_currency, CurrencyCode, LocalCurrencyMapper, BASE_CURRENCY};
    pub use crate::engine::{FxPipeline, PipelineInputs, PipelineOutput};
    pub use crate::error::{FxError, Result};
    pub use crate::finance::{
        BalanceConverter, CustomerBalanceBase, CustomerBalanceLocal, LocalBalanceConverter,
    };
    pub use crate::fx::{FxRateLong, FxRateWide, RateSnapshot, RawFxRates};
    pub use crate::types::*;
}
