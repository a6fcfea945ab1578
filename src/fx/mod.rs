//! FX rate normalization engine
//!
//! Turns a sparse, wide table of cross-currency observations into a dense
//! daily series and extracts point-in-time rates from it.
//!
//! # Components
//!
//! - **table**: Raw wide, long and dense wide table types
//! - **unpivot**: Wide to long reshape joined against the calendar
//! - **fill**: Per-currency forward fill
//! - **pivot**: Long to wide reshape
//! - **snapshot**: Rates on a single date, plus the base currency
//!
//! # Example
//!
//! ```rust
//! use rusty_fxnorm::calendar;
//! use rusty_fxnorm::currency::CurrencyCode;
//! use rusty_fxnorm::fx::{fill, pivot, snapshot, unpivot, RawFxRates};
//! use chrono::NaiveDate;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2022, 1, day).unwrap();
//!
//! let mut raw = RawFxRates::new(vec!["EURUSD".to_string()]);
//! raw.insert_row(d(1), vec![Some(1.10)]).unwrap();
//!
//! let days = calendar::build(d(1), d(5)).unwrap();
//! let columns = raw.currency_columns().to_vec();
//! let filled = fill(&unpivot(&days, &raw, &columns).unwrap());
//!
//! let wide = pivot(&filled, &columns);
//! assert_eq!(wide.get(d(5), "EURUSD"), Some(1.10));
//!
//! let snap = snapshot(&filled, d(5), &CurrencyCode::base()).unwrap();
//! assert_eq!(snap.get(&CurrencyCode::parse("EUR").unwrap()), Some(1.10));
//! ```

pub mod fill;
pub mod pivot;
pub mod snapshot;
pub mod table;
pub mod unpivot;

pub use fill::fill;
pub use pivot::pivot;
pub use snapshot::{snapshot, RateSnapshot};
pub use table::{FxRateLong, FxRateRow, FxRateWide, RawFxRates, WideRow};
pub use unpivot::unpivot;
