//! Parallel cross-validation over many gauges.

use hydrobias_series::{AlignConfig, Observation, SimulatedValue, align};
use rayon::prelude::*;
use tracing::{info_span, warn};

use crate::config::CvConfig;
use crate::crossval::{GaugeReport, GaugeStatus, cross_validate};

/// Raw inputs of one gauge, owned so a worker can consume them.
#[derive(Debug, Clone)]
pub struct GaugeInput {
    pub gauge_id: u32,
    pub observations: Vec<Observation>,
    pub simulations: Vec<SimulatedValue>,
}

/// Aligns and cross-validates one gauge. Never fails: problems become a status.
pub fn run_gauge(input: GaugeInput, align_config: &AlignConfig, cv: &CvConfig) -> GaugeReport {
    let _span = info_span!("gauge", gauge_id = input.gauge_id).entered();
    match align(&input.observations, &input.simulations, align_config) {
        Ok(series) => cross_validate(input.gauge_id, &series, cv),
        Err(e) => {
            warn!(gauge_id = input.gauge_id, error = %e, "input rejected");
            GaugeReport::without_rows(
                input.gauge_id,
                GaugeStatus::Failed {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Cross-validates every gauge on the rayon pool.
///
/// Reports are returned in input order, one per gauge, whatever the outcome.
pub fn run_batch(
    inputs: Vec<GaugeInput>,
    align_config: &AlignConfig,
    cv: &CvConfig,
) -> Vec<GaugeReport> {
    inputs
        .into_par_iter()
        .map(|input| run_gauge(input, align_config, cv))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input(gauge_id: u32, years: &[i32], negative: bool) -> GaugeInput {
        let mut observations = Vec::new();
        let mut simulations = Vec::new();
        for &y in years {
            let start = NaiveDate::from_ymd_opt(y, 5, 1).unwrap();
            for (i, d) in start.iter_days().take(120).enumerate() {
                let q = 3.0 + (i % 11) as f64;
                observations.push(Observation::new(d, Some(if negative { -q } else { q })));
                let stamp = d.succ_opt().unwrap().and_hms_opt(6, 0, 0).unwrap();
                simulations.push(SimulatedValue::new(stamp, q * 1.2));
            }
        }
        GaugeInput {
            gauge_id,
            observations,
            simulations,
        }
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let inputs = vec![
            input(10, &[2000, 2001, 2002], false),
            input(11, &[], false),
            input(12, &[2000], false),
            input(13, &[2000, 2001], true),
        ];
        let cv = CvConfig::new().with_quantiles(vec![1, 5]);
        let reports = run_batch(inputs, &AlignConfig::new(), &cv);

        let ids: Vec<u32> = reports.iter().map(|r| r.gauge_id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13]);
        assert_eq!(reports[0].status, GaugeStatus::Completed { rows: 9 });
        assert_eq!(reports[1].status, GaugeStatus::NoData);
        assert_eq!(reports[2].status, GaugeStatus::InsufficientData);
        assert!(matches!(reports[3].status, GaugeStatus::Failed { .. }));
    }
}
