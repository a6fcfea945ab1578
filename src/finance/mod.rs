//! Finance module - balance conversion into base and local currency

pub mod balance;
pub mod local;
pub mod money;

pub use balance::{BalanceConverter, BaseBalanceRow, CustomerBalanceBase, MissingRate};
pub use local::{CustomerBalanceLocal, LocalBalanceConverter, LocalBalanceRow};
pub use money::{round_money, MONEY_DECIMAL_PLACES};
