//! Per-setting medians across folds.

use std::collections::BTreeMap;

use hydrobias_metrics::Metrics;
use hydrobias_stats::{median, sorted};
use serde::{Deserialize, Serialize};

use crate::crossval::{Correction, ResultRow};

/// Median metrics of one (gauge, correction, quantile count) across folds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub gauge_id: u32,
    pub correction: Correction,
    pub quantiles: Option<usize>,
    /// Folds with at least one available metric.
    pub n_folds: usize,
    pub median: Metrics,
}

/// Median of the present values, `None` if all are missing.
fn median_of(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(median(&sorted(&present)))
    }
}

/// Summarises result rows per gauge, correction type and quantile count.
///
/// Output is ordered by gauge, then raw before DQM, then quantile count.
pub fn summarize(rows: &[ResultRow]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<(u32, Correction, Option<usize>), Vec<&Metrics>> = BTreeMap::new();
    for r in rows {
        groups
            .entry((r.gauge_id, r.correction, r.quantiles))
            .or_default()
            .push(&r.metrics);
    }

    groups
        .into_iter()
        .map(|((gauge_id, correction, quantiles), metrics)| {
            let n_folds = metrics
                .iter()
                .filter(|m| m.values().iter().any(Option::is_some))
                .count();
            let values: [Option<f64>; 6] =
                std::array::from_fn(|k| median_of(metrics.iter().map(|m| m.values()[k])));
            SummaryRow {
                gauge_id,
                correction,
                quantiles,
                n_folds,
                median: Metrics::from_values(values),
            }
        })
        .collect()
}
