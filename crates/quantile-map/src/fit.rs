//! DQM training: per-group scaling, quantile anchors and adjustment factors.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use hydrobias_stats::{mean, quantile_type7, sorted};
use tracing::debug;

use crate::config::{Kind, QmConfig};
use crate::error::QuantileMapError;
use crate::model::{DqmModel, GroupParams};

/// Probability levels `(k - 0.5) / n` for `k = 1..=n`.
pub(crate) fn probability_nodes(n: usize) -> Vec<f64> {
    (1..=n).map(|k| (k as f64 - 0.5) / n as f64).collect()
}

/// Type-7 quantiles of `values` at every node.
fn quantiles(values: &[f64], nodes: &[f64]) -> Vec<f64> {
    let s = sorted(values);
    nodes.iter().map(|&p| quantile_type7(&s, p)).collect()
}

/// Checks that every value is finite, and positive for multiplicative mapping.
pub(crate) fn check_values(values: &[f64], kind: Kind) -> Result<(), QuantileMapError> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(QuantileMapError::NonFiniteValue { index, value });
        }
        if kind == Kind::Multiplicative && value <= 0.0 {
            return Err(QuantileMapError::NonPositiveValue { index, value });
        }
    }
    Ok(())
}

/// Fits the parameters of one group from its member values.
fn fit_group(obs: &[f64], sim: &[f64], nodes: &[f64], kind: Kind) -> GroupParams {
    let scaling = kind.factor(mean(obs), mean(sim));
    let scaled: Vec<f64> = sim.iter().map(|&s| kind.apply(s, scaling)).collect();
    let hist_q = quantiles(&scaled, nodes);
    let ref_q = quantiles(obs, nodes);
    let af = ref_q
        .iter()
        .zip(hist_q.iter())
        .map(|(&r, &h)| kind.factor(r, h))
        .collect();
    GroupParams {
        scaling,
        hist_q,
        af,
    }
}

/// Trains a DQM model on paired observed and simulated values.
///
/// A group is trained when its seasonal window holds at least `n_quantiles`
/// training dates, whether or not any date falls on the group's own day, so
/// a missing calendar day does not leave a hole in the model. A group that is
/// the own group of some training date but has too few window members is an
/// error. Groups with fewer members that no training date falls on (the
/// edges of the training season) stay untrained.
///
/// # Errors
///
/// - [`QuantileMapError::EmptyData`] if there is no training data.
/// - [`QuantileMapError::LengthMismatch`] if the slices differ in length.
/// - [`QuantileMapError::NonFiniteValue`] / [`QuantileMapError::NonPositiveValue`]
///   for unusable values.
/// - [`QuantileMapError::InsufficientGroupData`] if a group some training date
///   falls on has fewer window members than quantile anchors.
pub fn train(
    obs: &[f64],
    sim: &[f64],
    dates: &[NaiveDate],
    config: &QmConfig,
) -> Result<DqmModel, QuantileMapError> {
    config.validate()?;
    if obs.is_empty() {
        return Err(QuantileMapError::EmptyData);
    }
    for (what, got) in [("sim", sim.len()), ("dates", dates.len())] {
        if got != obs.len() {
            return Err(QuantileMapError::LengthMismatch {
                what,
                expected: obs.len(),
                got,
            });
        }
    }
    let kind = config.kind();
    check_values(obs, kind)?;
    check_values(sim, kind)?;

    let grouping = config.grouping();
    let required = config.n_quantiles();
    let nodes = probability_nodes(required);
    let keys: Vec<u16> = dates.iter().map(|&d| grouping.group_of(d)).collect();
    let occupied: BTreeSet<u16> = keys.iter().copied().collect();

    let mut groups = BTreeMap::new();
    let mut n_sparse = 0usize;
    for g in grouping.all_groups() {
        let members = grouping.members_by_key(g, &keys);
        if members.is_empty() {
            continue;
        }
        if members.len() < required {
            if occupied.contains(&g) {
                return Err(QuantileMapError::InsufficientGroupData {
                    group: g,
                    n: members.len(),
                    required,
                });
            }
            n_sparse += 1;
            continue;
        }
        let g_obs: Vec<f64> = members.iter().map(|&i| obs[i]).collect();
        let g_sim: Vec<f64> = members.iter().map(|&i| sim[i]).collect();
        groups.insert(g, fit_group(&g_obs, &g_sim, &nodes, kind));
    }

    debug!(
        n_train = obs.len(),
        n_groups = groups.len(),
        n_sparse_edge_groups = n_sparse,
        n_quantiles = required,
        ?kind,
        "trained DQM model"
    );

    Ok(DqmModel::new(kind, grouping, nodes, obs.len(), groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Grouping;
    use approx::assert_relative_eq;
    use chrono::Datelike;

    fn june(year: i32, n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(year, 6, d).unwrap())
            .collect()
    }

    #[test]
    fn nodes_are_midpoints() {
        assert_eq!(probability_nodes(1), vec![0.5]);
        let n4 = probability_nodes(4);
        assert_relative_eq!(n4[0], 0.125);
        assert_relative_eq!(n4[3], 0.875);
    }

    #[test]
    fn scaled_sim_yields_unit_factors() {
        let obs: Vec<f64> = (1..=10).map(f64::from).collect();
        let sim: Vec<f64> = obs.iter().map(|v| v * 2.0).collect();
        let config = QmConfig::new()
            .with_n_quantiles(5)
            .with_grouping(Grouping::Month);
        let model = train(&obs, &sim, &june(2000, 10), &config).unwrap();

        let g = model.group(6).unwrap();
        assert_relative_eq!(g.scaling, 0.5);
        for &f in &g.af {
            assert_relative_eq!(f, 1.0, epsilon = 1e-12);
        }
        assert_eq!(model.trained_groups(), vec![6]);
        assert_eq!(model.n_train(), 10);
    }

    #[test]
    fn additive_factors_are_differences() {
        let obs: Vec<f64> = (1..=10).map(f64::from).collect();
        // Spread twice as wide, same mean after the additive shift.
        let sim: Vec<f64> = obs.iter().map(|v| 2.0 * v).collect();
        let config = QmConfig::new()
            .with_n_quantiles(2)
            .with_grouping(Grouping::Month)
            .with_kind(Kind::Additive);
        let model = train(&obs, &sim, &june(2000, 10), &config).unwrap();
        let g = model.group(6).unwrap();
        assert_relative_eq!(g.scaling, 5.5 - 11.0);
        // Low anchor is under-dispersed upwards, high anchor downwards.
        assert!(g.af[0] > 0.0);
        assert!(g.af[1] < 0.0);
    }

    #[test]
    fn insufficient_group_is_an_error() {
        let obs = vec![1.0, 2.0, 3.0];
        let config = QmConfig::new()
            .with_n_quantiles(5)
            .with_grouping(Grouping::Month);
        let err = train(&obs, &obs, &june(2000, 3), &config).unwrap_err();
        assert_eq!(
            err,
            QuantileMapError::InsufficientGroupData {
                group: 6,
                n: 3,
                required: 5
            }
        );
    }

    #[test]
    fn empty_groups_stay_untrained() {
        let obs: Vec<f64> = (1..=6).map(f64::from).collect();
        let config = QmConfig::new()
            .with_n_quantiles(3)
            .with_grouping(Grouping::Month);
        let model = train(&obs, &obs, &june(2000, 6), &config).unwrap();
        assert!(model.group(7).is_none());
    }

    #[test]
    fn missing_day_is_covered_by_its_window() {
        // Three Junes, each without June 15.
        let mut dates = Vec::new();
        for y in [2000, 2001, 2002] {
            dates.extend(june(y, 30).into_iter().filter(|d| d.day() != 15));
        }
        let obs: Vec<f64> = (0..dates.len()).map(|i| 1.0 + (i % 7) as f64).collect();
        let sim: Vec<f64> = obs.iter().map(|v| v * 1.5).collect();
        let config = QmConfig::new()
            .with_n_quantiles(5)
            .with_grouping(Grouping::DayOfYear { window: 31 });
        let model = train(&obs, &sim, &dates, &config).unwrap();

        let june_15 = NaiveDate::from_ymd_opt(2001, 6, 15).unwrap();
        let key = config.grouping().group_of(june_15);
        assert!(model.group(key).is_some());
    }

    #[test]
    fn sparse_season_edge_stays_untrained() {
        // June only: May 17 reaches June 1 alone, one member per year.
        let obs: Vec<f64> = (1..=30).map(f64::from).collect();
        let config = QmConfig::new()
            .with_n_quantiles(5)
            .with_grouping(Grouping::DayOfYear { window: 31 });
        let model = train(&obs, &obs, &june(2000, 30), &config).unwrap();

        let may = |d| NaiveDate::from_ymd_opt(2000, 5, d).unwrap();
        let g = config.grouping();
        assert!(model.group(g.group_of(may(17))).is_none());
        assert!(model.group(g.group_of(may(16))).is_none());
        // Window members June 1..=5 are enough for May 21.
        assert!(model.group(g.group_of(may(21))).is_some());
        assert!(model.group(g.group_of(june(2000, 30)[29])).is_some());
    }

    #[test]
    fn multiplicative_rejects_zero() {
        let obs = vec![1.0, 0.0];
        let err = train(&obs, &obs, &june(2000, 2), &QmConfig::new()).unwrap_err();
        assert!(matches!(err, QuantileMapError::NonPositiveValue { index: 1, .. }));
    }

    #[test]
    fn length_mismatch() {
        let err = train(&[1.0, 2.0], &[1.0], &june(2000, 2), &QmConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            QuantileMapError::LengthMismatch { what: "sim", .. }
        ));
    }

    #[test]
    fn empty_input() {
        assert_eq!(
            train(&[], &[], &[], &QmConfig::new()).unwrap_err(),
            QuantileMapError::EmptyData
        );
    }
}
