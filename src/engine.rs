//! Pipeline orchestration
//!
//! Runs every stage in order against one reference date:
//! calendar -> unpivot -> fill -> {pivot, snapshot} -> base totals -> local totals.

use crate::calendar;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::finance::{
    BalanceConverter, CustomerBalanceBase, CustomerBalanceLocal, LocalBalanceConverter,
};
use crate::fx::{self, FxRateLong, FxRateWide, RateSnapshot, RawFxRates};
use crate::types::{Account, Customer, Date};

/// The three input tables
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub customers: Vec<Customer>,
    pub accounts: Vec<Account>,
    pub fx_rates: RawFxRates,
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Date every stage was evaluated against
    pub reference_date: Date,
    /// Dense wide FX table
    pub fx_rate_clean: FxRateWide,
    /// Rates on the reference date
    pub snapshot: RateSnapshot,
    pub customer_balance_base: CustomerBalanceBase,
    pub customer_balance_local: CustomerBalanceLocal,
}

/// Dense FX series plus its long, filled form
#[derive(Debug, Clone)]
pub struct NormalizedRates {
    pub filled: FxRateLong,
    pub wide: FxRateWide,
}

/// FX normalization and balance conversion pipeline
#[derive(Debug, Clone, Default)]
pub struct FxPipeline {
    config: PipelineConfig,
}

impl FxPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Densify, forward fill and pivot the raw FX table up to `reference_date`
    pub fn normalize_rates(
        &self,
        raw: &RawFxRates,
        reference_date: Date,
    ) -> Result<NormalizedRates> {
        let days = calendar::build(self.config.start_date, reference_date)?;
        let columns = raw.currency_columns().to_vec();

        log::info!(
            "Normalizing {} currencies over {} days ({} .. {})",
            columns.len(),
            days.len(),
            self.config.start_date,
            reference_date
        );

        let long = fx::unpivot(&days, raw, &columns)?;
        let filled = fx::fill(&long);
        let wide = fx::pivot(&filled, &columns);

        Ok(NormalizedRates { filled, wide })
    }

    /// Rates in effect on `at_date`
    pub fn rate_snapshot(&self, raw: &RawFxRates, at_date: Date) -> Result<RateSnapshot> {
        let normalized = self.normalize_rates(raw, at_date)?;
        fx::snapshot(&normalized.filled, at_date, &self.config.base_currency)
    }

    /// Run the full pipeline
    pub fn run(&self, inputs: &PipelineInputs, reference_date: Date) -> Result<PipelineOutput> {
        log::info!("Starting FX pipeline for {}", reference_date);

        let NormalizedRates { filled, wide } =
            self.normalize_rates(&inputs.fx_rates, reference_date)?;
        let snapshot = fx::snapshot(&filled, reference_date, &self.config.base_currency)?;
        log::info!("Snapshot on {} holds {} currencies", reference_date, snapshot.len());

        let base = BalanceConverter::new(self.config.missing_rate_policy, self.config.rounding)
            .to_base(&inputs.accounts, &snapshot)?;

        let local = LocalBalanceConverter::new(self.config.rounding).convert(
            &inputs.customers,
            &base,
            &snapshot,
            &self.config.local_currency_mapper(),
        )?;

        log::info!("FX pipeline complete");

        Ok(PipelineOutput {
            reference_date,
            fx_rate_clean: wide,
            snapshot,
            customer_balance_base: base,
            customer_balance_local: local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingRatePolicy;
    use crate::currency::CurrencyCode;
    use crate::error::FxError;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn inputs() -> PipelineInputs {
        let mut fx_rates = RawFxRates::new(vec![
            "EURUSD".to_string(),
            "GBPUSD".to_string(),
            "CHFUSD".to_string(),
        ]);
        fx_rates.insert_row(date(2022, 5, 10), vec![Some(1.05), Some(1.23), None]).unwrap();
        fx_rates.insert_row(date(2022, 5, 13), vec![Some(1.04), None, Some(1.00)]).unwrap();

        PipelineInputs {
            customers: vec![
                Customer::new(1, "IT"),
                Customer::new(2, "UK"),
                Customer::new(3, "US"),
            ],
            accounts: vec![
                Account::new(10, 1, code("EUR"), 100.0),
                Account::new(11, 1, code("USD"), 50.0),
                Account::new(12, 2, code("GBP"), 200.0),
                Account::new(13, 3, code("CHF"), 10.0),
            ],
            fx_rates,
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            start_date: date(2022, 5, 1),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_run() {
        let output = FxPipeline::new(config()).run(&inputs(), date(2022, 5, 15)).unwrap();

        assert_eq!(output.reference_date, date(2022, 5, 15));
        assert_eq!(output.fx_rate_clean.num_rows(), 15);
        assert_eq!(output.fx_rate_clean.get(date(2022, 5, 15), "GBPUSD"), Some(1.23));
        assert_eq!(output.fx_rate_clean.get(date(2022, 5, 12), "CHFUSD"), None);

        assert_eq!(output.snapshot.get(&code("EUR")), Some(1.04));
        assert_eq!(output.snapshot.get(&code("USD")), Some(1.0));

        let base = &output.customer_balance_base;
        assert_eq!(base.get(1), Some(Some(154.0)));
        assert_eq!(base.get(2), Some(Some(246.0)));
        assert_eq!(base.get(3), Some(Some(10.0)));

        let local = &output.customer_balance_local;
        assert_eq!(local.get(1).unwrap().local_currency, code("EUR"));
        assert_eq!(local.get(1).unwrap().tot_balance, Some(148.08));
        assert_eq!(local.get(2).unwrap().tot_balance, Some(200.0));
        assert_eq!(local.get(3).unwrap().tot_balance, Some(10.0));
    }

    #[test]
    fn test_run_is_repeatable() {
        let pipeline = FxPipeline::new(config());
        let first = pipeline.run(&inputs(), date(2022, 5, 15)).unwrap();
        let second = pipeline.run(&inputs(), date(2022, 5, 15)).unwrap();

        assert_eq!(first.fx_rate_clean, second.fx_rate_clean);
        assert_eq!(first.customer_balance_base, second.customer_balance_base);
        assert_eq!(first.customer_balance_local, second.customer_balance_local);
    }

    #[test]
    fn test_reference_date_before_observations() {
        let mut config = config();
        config.missing_rate_policy = MissingRatePolicy::Fail;

        let result = FxPipeline::new(config).run(&inputs(), date(2022, 5, 5));
        assert!(matches!(result, Err(FxError::MissingCurrencyRate { .. })));
    }

    #[test]
    fn test_rate_snapshot() {
        let snap = FxPipeline::new(config())
            .rate_snapshot(&inputs().fx_rates, date(2022, 5, 11))
            .unwrap();

        assert_eq!(snap.get(&code("EUR")), Some(1.05));
        assert_eq!(snap.get(&code("GBP")), Some(1.23));
        assert!(!snap.contains(&code("CHF")));
    }

    #[test]
    fn test_reference_date_before_start_fails() {
        let result = FxPipeline::new(config()).run(&inputs(), date(2022, 4, 1));
        assert!(matches!(result, Err(FxError::CalendarError(_))));
    }
}
