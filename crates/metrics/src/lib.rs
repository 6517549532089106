//! Hydrological goodness-of-fit metrics for paired discharge series.
//!
//! [`evaluate`] masks out unusable pairs, enforces a minimum sample count and
//! returns a [`Metrics`] bundle in which every undefined statistic is `None`.
//!
//! ```
//! use hydrobias_metrics::{MetricsConfig, evaluate};
//!
//! let obs: Vec<f64> = (1..=20).map(f64::from).collect();
//! let sim: Vec<f64> = obs.iter().map(|v| v * 1.1).collect();
//! let m = evaluate(&obs, &sim, &MetricsConfig::default()).unwrap();
//! assert!(m.pbias.unwrap() > 9.9);
//! ```

mod config;
mod error;
pub mod scores;

pub use config::MetricsConfig;
pub use error::MetricsError;

use serde::{Deserialize, Serialize};

/// The fixed bundle of scores for one observed/simulated comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub nse: Option<f64>,
    pub log_nse: Option<f64>,
    pub kgeprime: Option<f64>,
    pub kgenp: Option<f64>,
    pub pbias: Option<f64>,
    pub rmse: Option<f64>,
}

impl Metrics {
    /// Column names in output order.
    pub const NAMES: [&'static str; 6] = ["nse", "log_nse", "kgeprime", "kgenp", "pbias", "rmse"];

    /// A record with every metric missing.
    pub fn missing() -> Self {
        Self::default()
    }

    /// Values in the order of [`Metrics::NAMES`].
    pub fn values(&self) -> [Option<f64>; 6] {
        [
            self.nse,
            self.log_nse,
            self.kgeprime,
            self.kgenp,
            self.pbias,
            self.rmse,
        ]
    }

    /// Builds a record from values in the order of [`Metrics::NAMES`].
    pub fn from_values(values: [Option<f64>; 6]) -> Self {
        let [nse, log_nse, kgeprime, kgenp, pbias, rmse] = values;
        Self {
            nse,
            log_nse,
            kgeprime,
            kgenp,
            pbias,
            rmse,
        }
    }
}

/// Keeps pairs where both values are finite and strictly positive.
fn mask_pairs(obs: &[f64], sim: &[f64]) -> (Vec<f64>, Vec<f64>) {
    obs.iter()
        .zip(sim.iter())
        .filter(|&(&o, &s)| o.is_finite() && s.is_finite() && o > 0.0 && s > 0.0)
        .map(|(&o, &s)| (o, s))
        .unzip()
}

/// Scores `sim` against `obs`.
///
/// # Errors
///
/// - [`MetricsError::LengthMismatch`] if the slices differ in length.
/// - [`MetricsError::InvalidConfig`] for an invalid configuration.
/// - [`MetricsError::InsufficientData`] if fewer than `min_samples` pairs
///   survive the mask.
pub fn evaluate(obs: &[f64], sim: &[f64], config: &MetricsConfig) -> Result<Metrics, MetricsError> {
    config.validate()?;
    if obs.len() != sim.len() {
        return Err(MetricsError::LengthMismatch {
            obs_len: obs.len(),
            sim_len: sim.len(),
        });
    }

    let (o, s) = mask_pairs(obs, sim);
    if o.len() < config.min_samples() {
        return Err(MetricsError::InsufficientData {
            valid: o.len(),
            required: config.min_samples(),
        });
    }

    Ok(Metrics {
        nse: scores::nse(&o, &s),
        log_nse: scores::log_nse(&o, &s),
        kgeprime: scores::kge_prime(&o, &s),
        kgenp: scores::kge_np(&o, &s),
        pbias: scores::pbias(&o, &s),
        rmse: scores::rmse(&o, &s),
    })
}
