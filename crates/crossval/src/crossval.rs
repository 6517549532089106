//! Fold × quantile-count evaluation grid for one gauge.

use std::fmt;

use hydrobias_metrics::{Metrics, MetricsConfig, MetricsError, evaluate};
use hydrobias_quantile_map::{QmConfig, QuantileMapError, adjust, train};
use hydrobias_series::AlignedSeries;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CvConfig;
use crate::split::{Fold, make_folds};

/// Whether a row scores the uncorrected or the DQM-corrected simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Correction {
    Raw,
    #[serde(rename = "DQM")]
    Dqm,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Correction::Raw => "Raw",
            Correction::Dqm => "DQM",
        })
    }
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub gauge_id: u32,
    pub correction: Correction,
    /// Quantile count; `None` for raw rows.
    pub quantiles: Option<usize>,
    pub fold: String,
    pub metrics: Metrics,
}

impl ResultRow {
    /// The `quantiles` column as written: the count, or `"raw"`.
    pub fn quantiles_label(&self) -> String {
        match self.quantiles {
            Some(q) => q.to_string(),
            None => "raw".to_string(),
        }
    }
}

/// Outcome of cross-validating one gauge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaugeStatus {
    /// The grid ran and produced `rows` result rows.
    Completed { rows: usize },
    /// Observed and simulated series do not overlap.
    NoData,
    /// Fewer valid years than the split scheme needs.
    InsufficientData,
    /// The gauge's input was rejected before any statistics.
    Failed { reason: String },
}

impl fmt::Display for GaugeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GaugeStatus::Completed { rows } => write!(f, "{rows}"),
            GaugeStatus::NoData => f.write_str("No Data"),
            GaugeStatus::InsufficientData => f.write_str("Insufficient Data"),
            GaugeStatus::Failed { reason } => write!(f, "Failed: {reason}"),
        }
    }
}

/// Status and result rows of one gauge.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeReport {
    pub gauge_id: u32,
    pub status: GaugeStatus,
    pub rows: Vec<ResultRow>,
}

impl GaugeReport {
    pub(crate) fn without_rows(gauge_id: u32, status: GaugeStatus) -> Self {
        Self {
            gauge_id,
            status,
            rows: Vec::new(),
        }
    }
}

/// Metrics of `sim` against `obs`, or an all-missing record when the sample
/// is too small.
fn score(obs: &[f64], sim: &[f64], config: &MetricsConfig, gauge_id: u32, fold: &str) -> Metrics {
    match evaluate(obs, sim, config) {
        Ok(m) => m,
        Err(MetricsError::InsufficientData { valid, required }) => {
            debug!(gauge_id, fold, valid, required, "too few pairs to score");
            Metrics::missing()
        }
        Err(e) => {
            warn!(gauge_id, fold, error = %e, "scoring failed");
            Metrics::missing()
        }
    }
}

/// Trains a model on `train_set` and adjusts the test simulation with it.
fn correct_fold(
    train_set: &AlignedSeries,
    test_set: &AlignedSeries,
    qm: &QmConfig,
) -> Result<Vec<f64>, QuantileMapError> {
    let model = train(
        &train_set.obs(),
        &train_set.sim(),
        &train_set.dates(),
        qm,
    )?;
    adjust(&model, &test_set.sim(), &test_set.dates())
}

/// Runs the raw and DQM rows of a single fold.
fn run_fold(gauge_id: u32, fold: &Fold, series: &AlignedSeries, config: &CvConfig) -> Vec<ResultRow> {
    let label = fold.label.to_string();
    let (train_set, test_set) = fold.split(series);
    let test_obs = test_set.obs();

    let mut rows = Vec::with_capacity(1 + config.quantiles().len());
    rows.push(ResultRow {
        gauge_id,
        correction: Correction::Raw,
        quantiles: None,
        fold: label.clone(),
        metrics: score(&test_obs, &test_set.sim(), config.metrics(), gauge_id, &label),
    });

    for &q in config.quantiles() {
        let qm = config.qm().clone().with_n_quantiles(q);
        match correct_fold(&train_set, &test_set, &qm) {
            Ok(corrected) => rows.push(ResultRow {
                gauge_id,
                correction: Correction::Dqm,
                quantiles: Some(q),
                fold: label.clone(),
                metrics: score(&test_obs, &corrected, config.metrics(), gauge_id, &label),
            }),
            Err(e) => {
                warn!(gauge_id, fold = %label, n_quantiles = q, error = %e, "DQM cell skipped");
            }
        }
    }
    rows
}

/// Cross-validates DQM on one gauge's aligned series.
///
/// Every fold yields one raw row and one DQM row per quantile count; a DQM
/// cell whose training or adjustment fails is logged and left out.
/// Configuration errors surface as [`GaugeStatus::Failed`].
pub fn cross_validate(gauge_id: u32, series: &AlignedSeries, config: &CvConfig) -> GaugeReport {
    if let Err(e) = config.validate() {
        return GaugeReport::without_rows(
            gauge_id,
            GaugeStatus::Failed {
                reason: e.to_string(),
            },
        );
    }
    if series.is_empty() {
        info!(gauge_id, "no overlapping data");
        return GaugeReport::without_rows(gauge_id, GaugeStatus::NoData);
    }

    let folds = make_folds(series, config.scheme(), config.min_valid_days());
    if folds.is_empty() {
        info!(gauge_id, n_years = series.years().len(), "not enough valid years");
        return GaugeReport::without_rows(gauge_id, GaugeStatus::InsufficientData);
    }

    let rows: Vec<ResultRow> = folds
        .iter()
        .flat_map(|fold| run_fold(gauge_id, fold, series, config))
        .collect();

    info!(gauge_id, n_folds = folds.len(), n_rows = rows.len(), "cross-validation done");
    GaugeReport {
        gauge_id,
        status: GaugeStatus::Completed { rows: rows.len() },
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hydrobias_quantile_map::Grouping;
    use hydrobias_series::AlignedRecord;

    fn seasonal_series(years: &[i32], days: usize) -> AlignedSeries {
        let mut records = Vec::new();
        for &y in years {
            let start = NaiveDate::from_ymd_opt(y, 5, 1).unwrap();
            for (i, d) in start.iter_days().take(days).enumerate() {
                let obs = 10.0 + (i % 17) as f64 + (y % 3) as f64;
                records.push(AlignedRecord::new(d, obs, obs * 1.3));
            }
        }
        AlignedSeries::from_records(records).unwrap()
    }

    #[test]
    fn status_display() {
        assert_eq!(GaugeStatus::Completed { rows: 12 }.to_string(), "12");
        assert_eq!(GaugeStatus::NoData.to_string(), "No Data");
        assert_eq!(
            GaugeStatus::InsufficientData.to_string(),
            "Insufficient Data"
        );
    }

    #[test]
    fn correction_labels() {
        assert_eq!(Correction::Raw.to_string(), "Raw");
        assert_eq!(Correction::Dqm.to_string(), "DQM");
    }

    #[test]
    fn empty_series_is_no_data() {
        let report = cross_validate(1, &AlignedSeries::default(), &CvConfig::new());
        assert_eq!(report.status, GaugeStatus::NoData);
        assert!(report.rows.is_empty());
    }

    #[test]
    fn one_valid_year_is_insufficient() {
        let s = seasonal_series(&[2000, 2001], 120);
        let thin = s
            .records()
            .iter()
            .filter(|r| r.year() == 2000 || r.month() == 5)
            .copied()
            .collect();
        let s = AlignedSeries::from_records(thin).unwrap();
        let report = cross_validate(1, &s, &CvConfig::new());
        assert_eq!(report.status, GaugeStatus::InsufficientData);
    }

    #[test]
    fn grid_is_complete() {
        let s = seasonal_series(&[2000, 2001, 2002], 120);
        let config = CvConfig::new()
            .with_quantiles(vec![1, 5, 10])
            .with_qm(QmConfig::new().with_grouping(Grouping::Month));
        let report = cross_validate(7, &s, &config);

        assert_eq!(report.status, GaugeStatus::Completed { rows: 12 });
        let raw = report
            .rows
            .iter()
            .filter(|r| r.correction == Correction::Raw)
            .count();
        assert_eq!(raw, 3);
        assert!(report.rows.iter().all(|r| r.gauge_id == 7));
        assert_eq!(report.rows[0].quantiles_label(), "raw");
        assert_eq!(report.rows[0].fold, "2000");
    }

    #[test]
    fn failing_cell_is_skipped() {
        // 91 days per year, month grouping: May and June train, but a
        // quantile count above the per-month support fails that cell only.
        let s = seasonal_series(&[2000, 2001], 91);
        let config = CvConfig::new()
            .with_quantiles(vec![5, 500])
            .with_min_valid_days(90)
            .with_qm(QmConfig::new().with_grouping(Grouping::Month));
        let report = cross_validate(3, &s, &config);

        assert_eq!(report.status, GaugeStatus::Completed { rows: 4 });
        assert!(report.rows.iter().all(|r| r.quantiles != Some(500)));
    }

    #[test]
    fn dqm_improves_scaled_bias() {
        let s = seasonal_series(&[2000, 2001, 2002], 150);
        let config = CvConfig::new()
            .with_quantiles(vec![10])
            .with_qm(QmConfig::new().with_grouping(Grouping::Month));
        let report = cross_validate(1, &s, &config);
        for pair in report.rows.chunks(2) {
            let raw = pair[0].metrics.pbias.unwrap().abs();
            let dqm = pair[1].metrics.pbias.unwrap().abs();
            assert!(dqm < raw, "fold {}: {dqm} !< {raw}", pair[0].fold);
        }
    }

    #[test]
    fn invalid_config_reports_failure() {
        let s = seasonal_series(&[2000, 2001], 120);
        let report = cross_validate(1, &s, &CvConfig::new().with_quantiles(vec![]));
        assert!(matches!(report.status, GaugeStatus::Failed { .. }));
    }
}
