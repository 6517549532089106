//! Accumulated validation of raw discharge inputs.
//!
//! [`ValidationCollector`] gathers every violation into a single
//! [`SeriesError::Validation`] so that a malformed gauge file is reported in
//! one pass instead of failing on the first bad row.

use crate::discharge::{Observation, SimulatedValue};
use crate::error::SeriesError;

/// Number of messages kept verbatim in the error details.
const MAX_DETAILS: usize = 10;

/// Accumulates validation errors and converts them into a single
/// [`SeriesError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns `Ok(())` if nothing was recorded, otherwise a single error
    /// whose details join the first messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), SeriesError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let count = self.errors.len();
        let mut details = self
            .errors
            .into_iter()
            .take(MAX_DETAILS)
            .collect::<Vec<_>>()
            .join("; ");
        if count > MAX_DETAILS {
            details.push_str(&format!("; and {} more", count - MAX_DETAILS));
        }
        Err(SeriesError::Validation { count, details })
    }
}

/// Checks that every present observation is non-negative.
///
/// Missing and NaN values are gaps, not errors.
pub(crate) fn validate_observations(observations: &[Observation]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for o in observations {
        if let Some(v) = o.valid_value()
            && v < 0.0
        {
            c.push(format!("observed discharge {v} on {} is negative", o.date));
        }
    }
    c
}

/// Checks that every finite simulated sample is non-negative.
pub(crate) fn validate_simulations(samples: &[SimulatedValue]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for s in samples {
        if s.value.is_finite() && s.value < 0.0 {
            c.push(format!(
                "simulated discharge {} at {} is negative",
                s.value, s.timestamp
            ));
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn collector_empty_is_ok() {
        assert!(ValidationCollector::new().finish().is_ok());
    }

    #[test]
    fn collector_truncates_details() {
        let mut c = ValidationCollector::new();
        for i in 0..12 {
            c.push(format!("e{i}"));
        }
        match c.finish() {
            Err(SeriesError::Validation { count, details }) => {
                assert_eq!(count, 12);
                assert!(details.ends_with("and 2 more"));
                assert!(!details.contains("e10"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn negative_observation_flagged() {
        let d = NaiveDate::from_ymd_opt(1980, 6, 1).unwrap();
        let obs = vec![
            Observation::new(d, Some(-1.0)),
            Observation::new(d, None),
            Observation::new(d, Some(f64::NAN)),
            Observation::new(d, Some(0.0)),
        ];
        let result = validate_observations(&obs).finish();
        assert!(matches!(result, Err(SeriesError::Validation { count: 1, .. })));
    }

    #[test]
    fn negative_simulation_flagged() {
        let t = NaiveDate::from_ymd_opt(1980, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let sims = vec![SimulatedValue::new(t, -0.5), SimulatedValue::new(t, 2.0)];
        let result = validate_simulations(&sims).finish();
        assert!(matches!(result, Err(SeriesError::Validation { count: 1, .. })));
    }
}
