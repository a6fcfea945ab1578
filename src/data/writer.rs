//! CSV and JSON writers for the pipeline's output tables

use crate::error::Result;
use crate::finance::{CustomerBalanceBase, CustomerBalanceLocal};
use crate::fx::FxRateWide;
use serde::Serialize;
use std::io::Write;

/// Write the dense FX table with the raw table's column layout.
/// Null cells are written empty.
pub fn write_fx_rate_clean<W: Write>(
    writer: W,
    wide: &FxRateWide,
    date_column: &str,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(wide.currency_columns().len() + 1);
    header.push(date_column.to_string());
    header.extend(wide.currency_columns().iter().cloned());
    wtr.write_record(&header)?;

    for row in wide.rows() {
        let mut record = Vec::with_capacity(row.rates.len() + 1);
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.extend(
            row.rates
                .iter()
                .map(|rate| rate.map(|r| r.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// `customer_id,tot_base_balance`
pub fn write_customer_balance_base<W: Write>(
    writer: W,
    balances: &CustomerBalanceBase,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in balances.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// `customer_id,local_currency,tot_balance`
pub fn write_customer_balance_local<W: Write>(
    writer: W,
    balances: &CustomerBalanceLocal,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in balances.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pretty-printed JSON for any output table
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
