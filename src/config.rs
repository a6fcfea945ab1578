//! Pipeline configuration

use crate::calendar;
use crate::currency::{CurrencyCode, LocalCurrencyMapper};
use crate::error::{FxError, Result};
use crate::types::Date;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Rounding applied to 2-decimal monetary totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoint away from zero (2.675 -> 2.68, -2.675 -> -2.68)
    #[default]
    HalfUp,
    /// Banker's rounding (2.665 -> 2.66, 2.675 -> 2.68)
    HalfEven,
}

/// What to do with an account whose currency has no rate in the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRatePolicy {
    /// The customer's total becomes null
    #[default]
    Propagate,
    /// The account contributes nothing; the total is null only if no account converted
    SkipAccount,
    /// Abort the run
    Fail,
}

/// Configuration shared by every pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// First day of the dense calendar
    pub start_date: Date,
    /// Settlement currency
    pub base_currency: CurrencyCode,
    pub rounding: RoundingMode,
    pub missing_rate_policy: MissingRatePolicy,
    /// Name of the date column in the raw FX table
    pub fx_date_column: String,
    /// Extra country -> local currency entries
    pub countries: BTreeMap<String, CurrencyCode>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            start_date: calendar::default_start_date(),
            base_currency: CurrencyCode::base(),
            rounding: RoundingMode::default(),
            missing_rate_policy: MissingRatePolicy::default(),
            fx_date_column: "fx_date".to_string(),
            countries: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| FxError::ConfigError(e.to_string()))
    }

    /// Load from an explicit path, else from the default location, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            let contents = fs::read_to_string(config_path).map_err(|e| {
                FxError::ConfigError(format!(
                    "Failed to read {}: {}",
                    config_path.display(),
                    e
                ))
            })?;
            return Self::from_toml_str(&contents);
        }

        if let Some(default_config) = default_config_path() {
            if default_config.exists() {
                log::debug!("Loading configuration from {}", default_config.display());
                let contents = fs::read_to_string(&default_config)?;
                return Self::from_toml_str(&contents);
            }
        }

        Ok(Self::default())
    }

    /// Country mapper honoring the configured entries
    pub fn local_currency_mapper(&self) -> LocalCurrencyMapper {
        LocalCurrencyMapper::with_countries(self.base_currency.clone(), self.countries.clone())
    }
}

/// `~/.rusty-fxnorm/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rusty-fxnorm").join("config.toml"))
}
