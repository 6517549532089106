//! Applying a trained model: scale, detrend, map, retrend.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use hydrobias_stats::{linear_fit, mean};
use tracing::debug;

use crate::config::Kind;
use crate::error::QuantileMapError;
use crate::fit::check_values;
use crate::model::DqmModel;

/// Mean-normalised least-squares trend of `values` over `times`.
///
/// Returns `None` when no usable trend exists: fewer than two distinct
/// times, or a multiplicative trend that is not strictly positive.
pub(crate) fn normalised_trend(times: &[f64], values: &[f64], kind: Kind) -> Option<Vec<f64>> {
    let fit = linear_fit(times, values)?;
    let line: Vec<f64> = times.iter().map(|&t| fit.at(t)).collect();
    let centre = mean(&line);
    match kind {
        Kind::Multiplicative => {
            if centre <= 0.0 || line.iter().any(|&v| v <= 0.0) {
                return None;
            }
            Some(line.iter().map(|v| v / centre).collect())
        }
        Kind::Additive => Some(line.iter().map(|v| v - centre).collect()),
    }
}

/// Adjusts simulated values with a trained model.
///
/// Each value is corrected by its own group. Within that group the model's
/// scaling is applied to every window member, a linear trend over the
/// members is removed, the detrended value is mapped through the
/// interpolated factor and the trend is restored.
///
/// # Errors
///
/// - [`QuantileMapError::LengthMismatch`] if `sim` and `dates` differ in length.
/// - [`QuantileMapError::NonFiniteValue`] / [`QuantileMapError::NonPositiveValue`]
///   for unusable values.
/// - [`QuantileMapError::UntrainedGroup`] if a value's group was not trained.
pub fn adjust(
    model: &DqmModel,
    sim: &[f64],
    dates: &[NaiveDate],
) -> Result<Vec<f64>, QuantileMapError> {
    if dates.len() != sim.len() {
        return Err(QuantileMapError::LengthMismatch {
            what: "dates",
            expected: sim.len(),
            got: dates.len(),
        });
    }
    let kind = model.kind();
    check_values(sim, kind)?;

    let grouping = model.grouping();
    let home: Vec<u16> = dates.iter().map(|&d| grouping.group_of(d)).collect();
    let needed: BTreeSet<u16> = home.iter().copied().collect();

    let ordinals: Vec<f64> = dates
        .iter()
        .map(|d| d.num_days_from_ce() as f64)
        .collect();

    let mut out = vec![f64::NAN; sim.len()];
    let mut n_flat = 0usize;
    for &g in &needed {
        let Some(params) = model.group(g) else {
            return Err(QuantileMapError::UntrainedGroup { group: g });
        };
        let members = grouping.members_by_key(g, &home);
        let times: Vec<f64> = members.iter().map(|&i| ordinals[i]).collect();
        let scaled: Vec<f64> = members
            .iter()
            .map(|&i| kind.apply(sim[i], params.scaling))
            .collect();

        let trend = normalised_trend(&times, &scaled, kind).unwrap_or_else(|| {
            n_flat += 1;
            vec![kind.identity(); members.len()]
        });

        for (j, &i) in members.iter().enumerate() {
            if home[i] != g {
                continue;
            }
            let detrended = kind.remove(scaled[j], trend[j]);
            let mapped = kind.apply(detrended, params.factor_at(detrended));
            out[i] = kind.apply(mapped, trend[j]);
        }
    }

    debug!(
        n_values = sim.len(),
        n_groups = needed.len(),
        n_untrended_groups = n_flat,
        "adjusted simulated series"
    );

    Ok(out)
}
