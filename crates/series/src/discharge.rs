//! Raw discharge records as delivered by the gauge archive and the model product.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A daily gauge reading. `value` is `None` where the record has a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }

    /// Returns the value if it is present and finite.
    pub fn valid_value(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// A simulated discharge sample at the model's native time step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedValue {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl SimulatedValue {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// A single value per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub value: f64,
}

/// Averages sub-daily samples into one value per calendar date.
///
/// Non-finite samples are ignored; a date with no finite sample is dropped.
/// The output is sorted by date.
pub fn aggregate_daily(samples: &[SimulatedValue]) -> Vec<DailyValue> {
    let mut sums: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for s in samples.iter().filter(|s| s.value.is_finite()) {
        let entry = sums.entry(s.timestamp.date()).or_insert((0.0, 0));
        entry.0 += s.value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(date, (sum, n))| DailyValue {
            date,
            value: sum / n as f64,
        })
        .collect()
}

/// Moves every date back by `days` calendar days.
///
/// The model stamps each daily value at the end of its accumulation period,
/// so a one-day backward shift assigns it to the day it describes.
pub fn shift_back(daily: &[DailyValue], days: i64) -> Vec<DailyValue> {
    daily
        .iter()
        .filter_map(|d| {
            TimeDelta::try_days(days)
                .and_then(|delta| d.date.checked_sub_signed(delta))
                .map(|date| DailyValue {
                    date,
                    value: d.value,
                })
        })
        .collect()
}

/// Aggregates simulated samples to daily means and applies the reporting offset.
pub fn prepare_simulation(samples: &[SimulatedValue], day_offset: i64) -> Vec<DailyValue> {
    shift_back(&aggregate_daily(samples), day_offset)
}
