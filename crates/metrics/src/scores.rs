//! Individual goodness-of-fit formulas.
//!
//! Every function takes already-masked, strictly positive, equal-length
//! slices and returns `None` when its formula is undefined on the sample.

use hydrobias_stats::{mean, ordinal_ranks, pearson_correlation, population_sd, sorted};

/// Nash-Sutcliffe efficiency. `None` if the observations are constant.
pub fn nse(obs: &[f64], sim: &[f64]) -> Option<f64> {
    let m = mean(obs);
    let denom: f64 = obs.iter().map(|&o| (o - m) * (o - m)).sum();
    if denom <= 0.0 {
        return None;
    }
    let num: f64 = obs
        .iter()
        .zip(sim.iter())
        .map(|(&o, &s)| (o - s) * (o - s))
        .sum();
    Some(1.0 - num / denom)
}

/// NSE computed on natural logarithms, emphasising low flows.
pub fn log_nse(obs: &[f64], sim: &[f64]) -> Option<f64> {
    let lo: Vec<f64> = obs.iter().map(|v| v.ln()).collect();
    let ls: Vec<f64> = sim.iter().map(|v| v.ln()).collect();
    nse(&lo, &ls)
}

/// Euclidean distance of the three KGE components from the ideal point.
fn kge_distance(r: f64, alpha: f64, beta: f64) -> f64 {
    1.0 - ((r - 1.0).powi(2) + (alpha - 1.0).powi(2) + (beta - 1.0).powi(2)).sqrt()
}

/// Modified Kling-Gupta efficiency with `alpha = std(sim) / std(obs)`.
pub fn kge_prime(obs: &[f64], sim: &[f64]) -> Option<f64> {
    let r = pearson_correlation(sim, obs)?;
    let sd_obs = population_sd(obs);
    let mean_obs = mean(obs);
    if sd_obs <= 0.0 || mean_obs <= 0.0 {
        return None;
    }
    let alpha = population_sd(sim) / sd_obs;
    let beta = mean(sim) / mean_obs;
    Some(kge_distance(r, alpha, beta))
}

/// Non-parametric KGE.
///
/// Correlation is Spearman's on ordinal ranks; variability is compared via
/// the normalised flow duration curves.
pub fn kge_np(obs: &[f64], sim: &[f64]) -> Option<f64> {
    let mean_obs = mean(obs);
    let mean_sim = mean(sim);
    if mean_obs <= 0.0 || mean_sim <= 0.0 {
        return None;
    }
    let r = pearson_correlation(&ordinal_ranks(sim), &ordinal_ranks(obs))?;

    let n = obs.len() as f64;
    let fdc_obs = sorted(&obs.iter().map(|v| v / (n * mean_obs)).collect::<Vec<_>>());
    let fdc_sim = sorted(&sim.iter().map(|v| v / (n * mean_sim)).collect::<Vec<_>>());
    let alpha = 1.0
        - 0.5
            * fdc_sim
                .iter()
                .zip(fdc_obs.iter())
                .map(|(s, o)| (s - o).abs())
                .sum::<f64>();
    let beta = mean_sim / mean_obs;
    Some(kge_distance(r, alpha, beta))
}

/// Percent bias, positive when the simulation overestimates.
pub fn pbias(obs: &[f64], sim: &[f64]) -> Option<f64> {
    let total: f64 = obs.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let diff: f64 = obs.iter().zip(sim.iter()).map(|(&o, &s)| s - o).sum();
    Some(100.0 * diff / total)
}

/// Root-mean-square error.
pub fn rmse(obs: &[f64], sim: &[f64]) -> Option<f64> {
    if obs.is_empty() {
        return None;
    }
    let mse = obs
        .iter()
        .zip(sim.iter())
        .map(|(&o, &s)| (s - o) * (s - o))
        .sum::<f64>()
        / obs.len() as f64;
    Some(mse.sqrt())
}
