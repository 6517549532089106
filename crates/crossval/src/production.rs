//! Production models: training a gauge's model and correcting new simulations.

use chrono::{Datelike, NaiveDate};
use hydrobias_quantile_map::{DqmModel, QmConfig, adjust, train};
use hydrobias_series::{AlignConfig, DailyValue, MonthRange, Observation, SimulatedValue, align};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::CrossvalError;

/// Configuration for [`correct_series`].
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionConfig {
    season: MonthRange,
    epsilon: f64,
}

impl CorrectionConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: correction season May to September, `epsilon = 0.01`.
    pub fn new() -> Self {
        Self {
            season: MonthRange::clamped(5, 9),
            epsilon: 0.01,
        }
    }

    /// Sets the months in which values are corrected.
    pub fn with_season(mut self, season: MonthRange) -> Self {
        self.season = season;
        self
    }

    /// Sets the floor added before and removed after adjustment.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn season(&self) -> MonthRange {
        self.season
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), CrossvalError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(CrossvalError::InvalidConfig {
                reason: format!("epsilon must be finite and > 0, got {}", self.epsilon),
            });
        }
        Ok(())
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A corrected daily discharge value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectedValue {
    pub date: NaiveDate,
    pub q_cor: f64,
}

/// Aligns a gauge over the analysis period and trains its production model.
///
/// # Errors
///
/// Returns [`CrossvalError::NoData`] if nothing aligns, and propagates
/// alignment and training errors.
pub fn train_gauge(
    gauge_id: u32,
    observations: &[Observation],
    simulations: &[SimulatedValue],
    align_config: &AlignConfig,
    qm: &QmConfig,
) -> Result<DqmModel, CrossvalError> {
    let series = align(observations, simulations, align_config)?;
    if series.is_empty() {
        return Err(CrossvalError::NoData { gauge_id });
    }
    let model = train(&series.obs(), &series.sim(), &series.dates(), qm)?;
    info!(
        gauge_id,
        n_train = model.n_train(),
        n_quantiles = model.n_quantiles(),
        n_groups = model.trained_groups().len(),
        "trained production model"
    );
    Ok(model)
}

/// A corrected record with the number of in-season days left uncorrected.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectedSeries {
    /// Corrected values, sorted by date.
    pub values: Vec<CorrectedValue>,
    /// In-season days passed through raw because the model could not adjust
    /// them.
    pub n_fallback: usize,
}

/// Raw value, clamped at zero.
fn passthrough(d: &DailyValue) -> CorrectedValue {
    CorrectedValue {
        date: d.date,
        q_cor: d.value.max(0.0),
    }
}

/// Corrects a daily simulated record with a trained model.
///
/// Values inside the correction season get `epsilon` added, are adjusted
/// together, then have `epsilon` removed and are clamped at zero. Values
/// outside the season are passed through, clamped at zero.
///
/// In-season values whose group the model never trained are passed through
/// like off-season values. If adjustment still fails, the error is logged and
/// every in-season value is passed through. Both count towards
/// [`CorrectedSeries::n_fallback`].
///
/// # Errors
///
/// Returns [`CrossvalError::InvalidConfig`] for an invalid configuration.
pub fn correct_series(
    model: &DqmModel,
    daily: &[DailyValue],
    config: &CorrectionConfig,
) -> Result<CorrectedSeries, CrossvalError> {
    config.validate()?;
    let eps = config.epsilon();
    let grouping = model.grouping();

    let (in_season, off_season): (Vec<DailyValue>, Vec<DailyValue>) = daily
        .iter()
        .copied()
        .partition(|d| config.season().contains(d.date.month() as u8));
    let (trained, untrained): (Vec<DailyValue>, Vec<DailyValue>) = in_season
        .into_iter()
        .partition(|d| model.group(grouping.group_of(d.date)).is_some());
    if !untrained.is_empty() {
        warn!(
            n_days = untrained.len(),
            "in-season days fall in untrained groups, passing them through"
        );
    }

    let mut out: Vec<CorrectedValue> = Vec::with_capacity(daily.len());
    let mut n_fallback = untrained.len();
    if !trained.is_empty() {
        let values: Vec<f64> = trained.iter().map(|d| d.value.max(0.0) + eps).collect();
        let dates: Vec<NaiveDate> = trained.iter().map(|d| d.date).collect();
        match adjust(model, &values, &dates) {
            Ok(adjusted) => {
                out.extend(
                    dates
                        .into_iter()
                        .zip(adjusted)
                        .map(|(date, v)| CorrectedValue {
                            date,
                            q_cor: (v - eps).max(0.0),
                        }),
                );
            }
            Err(e) => {
                warn!(
                    error = %e,
                    n_days = trained.len(),
                    "adjustment failed, passing season through"
                );
                n_fallback += trained.len();
                out.extend(trained.iter().map(passthrough));
            }
        }
    }
    out.extend(untrained.iter().map(passthrough));
    out.extend(off_season.iter().map(passthrough));
    out.sort_by_key(|c| c.date);

    debug!(
        n_values = out.len(),
        n_fallback,
        n_passed_through = off_season.len(),
        "corrected simulated series"
    );
    Ok(CorrectedSeries {
        values: out,
        n_fallback,
    })
}
