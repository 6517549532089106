//! Date alignment of observed and simulated discharge.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::aligned::{AlignedRecord, AlignedSeries};
use crate::calendar::{MonthRange, YearRange};
use crate::discharge::{Observation, SimulatedValue, prepare_simulation};
use crate::error::SeriesError;
use crate::validate;

/// Largest accepted `sim_day_offset`, in days.
pub const MAX_SIM_DAY_OFFSET: i64 = 366;

/// Configuration for [`align`].
///
/// # Example
///
/// ```
/// use hydrobias_series::{AlignConfig, MonthRange, YearRange};
///
/// let config = AlignConfig::new()
///     .with_years(YearRange::new(1979, 1996).unwrap())
///     .with_season(MonthRange::new(5, 10).unwrap());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AlignConfig {
    years: YearRange,
    season: MonthRange,
    epsilon: f64,
    sim_day_offset: i64,
}

impl AlignConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: all years, all months, `epsilon = 0.01`,
    /// `sim_day_offset = 1`.
    pub fn new() -> Self {
        Self {
            years: YearRange::unbounded(),
            season: MonthRange::all(),
            epsilon: 0.01,
            sim_day_offset: 1,
        }
    }

    /// Restricts the analysis to a range of calendar years.
    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    /// Restricts the analysis to a range of months.
    pub fn with_season(mut self, season: MonthRange) -> Self {
        self.season = season;
        self
    }

    /// Sets the additive floor applied to both series.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the number of days simulation dates are moved back.
    pub fn with_sim_day_offset(mut self, days: i64) -> Self {
        self.sim_day_offset = days;
        self
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn season(&self) -> MonthRange {
        self.season
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn sim_day_offset(&self) -> i64 {
        self.sim_day_offset
    }

    /// Validates this configuration.
    ///
    /// `epsilon` must be finite and strictly positive; `sim_day_offset` must
    /// lie in `0..=366`.
    pub fn validate(&self) -> Result<(), SeriesError> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SeriesError::InvalidConfig {
                reason: format!("epsilon must be finite and > 0, got {}", self.epsilon),
            });
        }
        if !(0..=MAX_SIM_DAY_OFFSET).contains(&self.sim_day_offset) {
            return Err(SeriesError::InvalidConfig {
                reason: format!(
                    "sim_day_offset must be in 0..={MAX_SIM_DAY_OFFSET}, got {}",
                    self.sim_day_offset
                ),
            });
        }
        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Aligns observed and simulated discharge into an [`AlignedSeries`].
///
/// Simulated samples are averaged per calendar day and moved back by
/// `sim_day_offset` days, then inner-joined with the observations on date.
/// Days where either side is missing are dropped, the remainder is
/// restricted to the configured years and season, and `epsilon` is added to
/// both values.
///
/// An empty result is not an error: it means the gauge has no usable overlap.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidConfig`] for an invalid configuration and
/// [`SeriesError::Validation`] if any present value is negative.
pub fn align(
    observations: &[Observation],
    simulations: &[SimulatedValue],
    config: &AlignConfig,
) -> Result<AlignedSeries, SeriesError> {
    config.validate()?;
    validate::validate_observations(observations).finish()?;
    validate::validate_simulations(simulations).finish()?;

    let sim_by_date: BTreeMap<NaiveDate, f64> =
        prepare_simulation(simulations, config.sim_day_offset)
            .into_iter()
            .map(|d| (d.date, d.value))
            .collect();

    // Repeated observation dates keep the last reading.
    let obs_by_date: BTreeMap<NaiveDate, f64> = observations
        .iter()
        .filter_map(|o| o.valid_value().map(|v| (o.date, v)))
        .collect();

    let eps = config.epsilon;
    let records: Vec<AlignedRecord> = obs_by_date
        .into_iter()
        .filter(|(date, _)| {
            config.years.contains(date.year()) && config.season.contains(date.month() as u8)
        })
        .filter_map(|(date, obs)| {
            sim_by_date
                .get(&date)
                .map(|&sim| AlignedRecord::new(date, obs + eps, sim + eps))
        })
        .collect();

    debug!(
        n_observations = observations.len(),
        n_simulations = simulations.len(),
        n_aligned = records.len(),
        "aligned discharge series"
    );

    Ok(AlignedSeries::from_sorted_unchecked(records))
}
