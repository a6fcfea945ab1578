//! Tabular input and output
//!
//! CSV loaders for the three input tables and writers for the three output
//! tables. The pipeline itself never touches files; this layer only turns
//! files into the in-memory tables it consumes.

pub mod loader;
pub mod writer;

pub use loader::{
    load_accounts, load_customers, load_fx_rates, read_accounts, read_customers, read_fx_rates,
    FxCsvFormat,
};
pub use writer::{
    write_customer_balance_base, write_customer_balance_local, write_fx_rate_clean, write_json,
};
