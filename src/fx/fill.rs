//! Per-currency forward fill (last observation carried forward)

use super::table::{FxRateLong, FxRateRow};
use crate::types::{Date, Rate};
use hashbrown::HashMap;
use rayon::prelude::*;
use std::sync::Arc;

/// One cross-currency partition: its label and (date, rate) points
type Partition = (Arc<str>, Vec<(Date, Option<Rate>)>);

/// Forward fill every cross-currency series.
///
/// Rows are partitioned by cross_currency and each partition is sorted by
/// date before a single left-to-right scan, so the result does not depend on
/// the input row order. Partitions are filled in parallel. Dates before a
/// currency's first observation stay `None`.
///
/// Output holds partitions in order of first appearance, dates ascending
/// within each partition.
pub fn fill(long_table: &FxRateLong) -> FxRateLong {
    let partitions = partition_by_currency(long_table.rows());

    let filled: Vec<Partition> = partitions
        .into_par_iter()
        .map(|(label, points)| (label, fill_partition(points)))
        .collect();

    let rows = filled
        .into_iter()
        .flat_map(|(label, points)| {
            points
                .into_iter()
                .map(move |(date, rate)| FxRateRow::new(date, Arc::clone(&label), rate))
        })
        .collect();

    FxRateLong::new(rows)
}

fn partition_by_currency(rows: &[FxRateRow]) -> Vec<Partition> {
    let mut index: HashMap<Arc<str>, usize> = HashMap::new();
    let mut partitions: Vec<Partition> = Vec::new();

    for row in rows {
        let slot = *index.entry(Arc::clone(&row.cross_currency)).or_insert_with(|| {
            partitions.push((Arc::clone(&row.cross_currency), Vec::new()));
            partitions.len() - 1
        });
        partitions[slot].1.push((row.date, row.rate));
    }

    partitions
}

/// Ordered scan carrying the last non-null rate seen so far
fn fill_partition(mut points: Vec<(Date, Option<Rate>)>) -> Vec<(Date, Option<Rate>)> {
    points.sort_by_key(|(date, _)| *date);

    let mut last_seen: Option<Rate> = None;
    points
        .into_iter()
        .map(|(date, rate)| {
            if rate.is_some() {
                last_seen = rate;
            }
            (date, last_seen)
        })
        .collect()
}
