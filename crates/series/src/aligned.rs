//! The aligned observed/simulated pair series consumed by validation and training.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SeriesError;
use crate::validate::ValidationCollector;

/// One day on which both an observation and a simulation exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRecord {
    pub date: NaiveDate,
    pub obs: f64,
    pub sim: f64,
}

impl AlignedRecord {
    pub fn new(date: NaiveDate, obs: f64, sim: f64) -> Self {
        Self { date, obs, sim }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u8 {
        self.date.month() as u8
    }
}

/// Date-ordered pairs of strictly positive observed and simulated discharge.
///
/// Dates are unique and ascending, and every value is finite and `> 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    records: Vec<AlignedRecord>,
}

impl AlignedSeries {
    /// Builds a series from records, sorting them by date.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::Validation`] if a date repeats or any value is
    /// non-finite or not strictly positive.
    pub fn from_records(mut records: Vec<AlignedRecord>) -> Result<Self, SeriesError> {
        records.sort_by_key(|r| r.date);

        let mut c = ValidationCollector::new();
        for pair in records.windows(2) {
            if pair[0].date == pair[1].date {
                c.push(format!("duplicate date {}", pair[0].date));
            }
        }
        for r in &records {
            if !(r.obs.is_finite() && r.obs > 0.0) {
                c.push(format!("obs {} on {} is not > 0", r.obs, r.date));
            }
            if !(r.sim.is_finite() && r.sim > 0.0) {
                c.push(format!("sim {} on {} is not > 0", r.sim, r.date));
            }
        }
        c.finish()?;

        Ok(Self { records })
    }

    /// Internal constructor for records already known to satisfy the invariants.
    pub(crate) fn from_sorted_unchecked(records: Vec<AlignedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AlignedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn obs(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.obs).collect()
    }

    pub fn sim(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sim).collect()
    }

    /// Distinct calendar years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.records
            .iter()
            .map(|r| r.year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of records per calendar year.
    pub fn year_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.records {
            *counts.entry(r.year()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the subset of records whose year is in `years`.
    pub fn select_years(&self, years: &BTreeSet<i32>) -> AlignedSeries {
        Self::from_sorted_unchecked(
            self.records
                .iter()
                .filter(|r| years.contains(&r.year()))
                .copied()
                .collect(),
        )
    }
}
