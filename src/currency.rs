//! Currency codes, cross-currency labels and the country to local currency table

use crate::error::{FxError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Settlement currency every balance is first normalized to
pub const BASE_CURRENCY: &str = "USD";

/// Three-letter currency code (ISO 4217 style), always upper case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a code, accepting any letter case
    pub fn parse(code: &str) -> Result<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidCurrencyCode(code.to_string()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The base currency (USD)
    pub fn base() -> Self {
        Self(BASE_CURRENCY.to_string())
    }

    /// Derive the currency a cross-currency label quotes, e.g. "EURUSD" -> EUR.
    ///
    /// Labels are assumed to follow the `CCC<quote>` layout: the first three
    /// characters name the currency, the rest is ignored.
    pub fn from_cross_pair(label: &str) -> Result<Self> {
        let prefix = label
            .get(..3)
            .ok_or_else(|| FxError::InvalidCrossCurrency(label.to_string()))?;
        Self::parse(prefix).map_err(|_| FxError::InvalidCrossCurrency(label.to_string()))
    }

    /// Get currency code as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the base currency
    pub fn is_base(&self) -> bool {
        self.0 == BASE_CURRENCY
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// Built-in country table
fn builtin_local_currency(country_id: &str) -> Option<&'static str> {
    match country_id {
        "IT" | "FR" | "DE" => Some("EUR"),
        "CH" => Some("CHF"),
        "UK" => Some("GBP"),
        "JP" => Some("JPY"),
        _ => None,
    }
}

/// Maps a customer's country to the currency their balance is reported in.
///
/// Total: countries missing from both the configured entries and the
/// built-in table map to the base currency.
#[derive(Debug, Clone)]
pub struct LocalCurrencyMapper {
    base: CurrencyCode,
    countries: BTreeMap<String, CurrencyCode>,
}

impl LocalCurrencyMapper {
    /// Create a mapper using only the built-in table
    pub fn new(base: CurrencyCode) -> Self {
        Self {
            base,
            countries: BTreeMap::new(),
        }
    }

    /// Create a mapper with extra country entries, consulted before the built-in table
    pub fn with_countries(base: CurrencyCode, countries: BTreeMap<String, CurrencyCode>) -> Self {
        Self { base, countries }
    }

    /// Local currency for a country id
    pub fn local_currency(&self, country_id: &str) -> CurrencyCode {
        if let Some(code) = self.countries.get(country_id) {
            return code.clone();
        }

        match builtin_local_currency(country_id) {
            Some(code) => CurrencyCode(code.to_string()),
            None => self.base.clone(),
        }
    }

    /// Base currency used as the fallback
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }
}

impl Default for LocalCurrencyMapper {
    fn default() -> Self {
        Self::new(CurrencyCode::base())
    }
}

/// Local currency for a country id using the built-in table and USD fallback
pub fn local_currency(country_id: &str) -> CurrencyCode {
    LocalCurrencyMapper::default().local_currency(country_id)
}
