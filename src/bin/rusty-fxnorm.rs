//! rusty-fxnorm CLI - FX normalization and balance conversion
//!
//! ## Example Usage
//!
//! ```bash
//! # Run the full pipeline, writing the three output tables to ./out
//! rusty-fxnorm run --customers customer.csv --accounts account.csv \
//!     --fx-rates fx_rate.csv --reference-date 2022-05-15 --output-dir out
//!
//! # Show the rates in effect on a date
//! rusty-fxnorm snapshot --fx-rates fx_rate.csv --date 2022-05-15
//!
//! # Count calendar days
//! rusty-fxnorm calendar --start 2000-01-01 --end 2022-05-15
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rusty_fxnorm::calendar;
use rusty_fxnorm::config::PipelineConfig;
use rusty_fxnorm::data::{self, FxCsvFormat};
use rusty_fxnorm::engine::{FxPipeline, PipelineInputs, PipelineOutput};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

/// rusty-fxnorm: dense FX rates and multi-currency balance reports
#[derive(Parser)]
#[command(name = "rusty-fxnorm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Dense FX rate normalization and balance conversion", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write the three output tables
    Run {
        /// Customer CSV (customer_id, country_id, ...)
        #[arg(long)]
        customers: PathBuf,

        /// Account CSV (account_id, customer_id, currency, balance)
        #[arg(long)]
        accounts: PathBuf,

        /// Wide FX rate CSV (fx_date, one column per cross currency)
        #[arg(long)]
        fx_rates: PathBuf,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(short = 'r', long)]
        reference_date: Option<String>,

        /// Directory for output files
        #[arg(short = 'o', long, default_value = ".")]
        output_dir: PathBuf,

        /// Output file format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Print the rates in effect on a date
    Snapshot {
        /// Wide FX rate CSV
        #[arg(long)]
        fx_rates: PathBuf,

        /// Snapshot date (YYYY-MM-DD), defaults to today
        #[arg(short = 'd', long)]
        date: Option<String>,
    },

    /// Print the size of the daily calendar between two dates
    Calendar {
        /// Start date (YYYY-MM-DD), defaults to the configured start date
        #[arg(short = 's', long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(short = 'e', long)]
        end: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // Sampled once; every stage of the run sees the same day.
    let today = Local::now().date_naive();

    let result = PipelineConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")
        .and_then(|config| match cli.command {
            Commands::Run {
                customers,
                accounts,
                fx_rates,
                reference_date,
                output_dir,
                format,
            } => run_pipeline(RunConfig {
                customers,
                accounts,
                fx_rates,
                reference_date: parse_date_or(reference_date.as_deref(), today)?,
                output_dir,
                format,
                verbose: cli.verbose,
                config,
            }),
            Commands::Snapshot { fx_rates, date } => {
                show_snapshot(&fx_rates, parse_date_or(date.as_deref(), today)?, &config)
            }
            Commands::Calendar { start, end } => show_calendar(
                parse_date_or(start.as_deref(), config.start_date)?,
                parse_date_or(end.as_deref(), today)?,
            ),
        });

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

struct RunConfig {
    customers: PathBuf,
    accounts: PathBuf,
    fx_rates: PathBuf,
    reference_date: NaiveDate,
    output_dir: PathBuf,
    format: OutputFormat,
    verbose: bool,
    config: PipelineConfig,
}

fn parse_date_or(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s)),
        None => Ok(default),
    }
}

fn fx_format(config: &PipelineConfig) -> FxCsvFormat {
    FxCsvFormat::with_date_column(config.fx_date_column.clone())
}

fn run_pipeline(cfg: RunConfig) -> Result<()> {
    println!("{}", "Running FX pipeline...".cyan().bold());

    if cfg.verbose {
        println!("  {} {}", "Reference date:".bold(), cfg.reference_date);
        println!("  {} {}", "Calendar start:".bold(), cfg.config.start_date);
        println!("  {} {}", "Base currency:".bold(), cfg.config.base_currency);
        println!("  {} {:?}", "Missing rates:".bold(), cfg.config.missing_rate_policy);
        println!("  {} {:?}", "Rounding:".bold(), cfg.config.rounding);
        println!();
    }

    let timer = Instant::now();
    let inputs = PipelineInputs {
        customers: data::load_customers(&cfg.customers)
            .with_context(|| format!("Failed to load {}", cfg.customers.display()))?,
        accounts: data::load_accounts(&cfg.accounts)
            .with_context(|| format!("Failed to load {}", cfg.accounts.display()))?,
        fx_rates: data::load_fx_rates(&cfg.fx_rates, &fx_format(&cfg.config))
            .with_context(|| format!("Failed to load {}", cfg.fx_rates.display()))?,
    };

    let pipeline = FxPipeline::new(cfg.config);
    let output = pipeline.run(&inputs, cfg.reference_date)?;

    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("Failed to create {}", cfg.output_dir.display()))?;
    write_outputs(&output, &cfg.output_dir, cfg.format, &pipeline.config().fx_date_column)?;

    println!();
    println!("{}", "Run Summary".green().bold());
    println!("{}", "===========".green());
    println!("  FX days:            {}", output.fx_rate_clean.num_rows());
    println!("  Currencies:         {}", output.fx_rate_clean.currency_columns().len());
    println!("  Customers (base):   {}", output.customer_balance_base.len());
    println!("  Customers (local):  {}", output.customer_balance_local.len());

    let missing = output.customer_balance_base.missing_rates();
    if missing.is_empty() {
        println!("  Missing rates:      {}", "0".green());
    } else {
        println!("  Missing rates:      {}", missing.len().to_string().yellow().bold());
        if cfg.verbose {
            for miss in missing {
                println!(
                    "    account {} (customer {}): no {} rate",
                    miss.account_id, miss.customer_id, miss.currency
                );
            }
        }
    }
    println!("  Elapsed:            {:?}", timer.elapsed());

    Ok(())
}

fn write_outputs(
    output: &PipelineOutput,
    dir: &Path,
    format: OutputFormat,
    date_column: &str,
) -> Result<()> {
    let path_for = |name: &str| dir.join(format!("{}.{}", name, format.extension()));
    let create = |path: &Path| -> Result<BufWriter<File>> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(BufWriter::new(file))
    };

    let fx_path = path_for("fx_rate_clean");
    let base_path = path_for("customer_balance_base");
    let local_path = path_for("customer_balance_local");

    match format {
        OutputFormat::Csv => {
            data::write_fx_rate_clean(create(&fx_path)?, &output.fx_rate_clean, date_column)?;
            data::write_customer_balance_base(create(&base_path)?, &output.customer_balance_base)?;
            data::write_customer_balance_local(
                create(&local_path)?,
                &output.customer_balance_local,
            )?;
        }
        OutputFormat::Json => {
            data::write_json(create(&fx_path)?, &output.fx_rate_clean)?;
            data::write_json(create(&base_path)?, &output.customer_balance_base.rows())?;
            data::write_json(create(&local_path)?, &output.customer_balance_local)?;
        }
    }

    for path in [&fx_path, &base_path, &local_path] {
        println!("{} Saved {}", "✓".green().bold(), path.display());
    }

    Ok(())
}

fn show_snapshot(fx_rates: &Path, date: NaiveDate, config: &PipelineConfig) -> Result<()> {
    let raw = data::load_fx_rates(fx_rates, &fx_format(config))
        .with_context(|| format!("Failed to load {}", fx_rates.display()))?;
    let snapshot = FxPipeline::new(config.clone()).rate_snapshot(&raw, date)?;

    println!("{} {}", "Rates on".cyan().bold(), date.to_string().cyan().bold());
    for (currency, rate) in snapshot.sorted() {
        let marker = if &currency == snapshot.base_currency() {
            " (base)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {}  {}{}", currency.to_string().bold(), rate, marker);
    }

    Ok(())
}

fn show_calendar(start: NaiveDate, end: NaiveDate) -> Result<()> {
    let days = calendar::build(start, end)?;

    println!("{}", "Calendar".cyan().bold());
    println!("  {} {}", "Start:".bold(), start);
    println!("  {} {}", "End:".bold(), end);
    println!("  {} {}", "Days:".bold(), days.len());

    Ok(())
}
