//! The trained DQM parameter set and its JSON encoding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Grouping, Kind};
use crate::error::QuantileMapError;

/// Current on-disk encoding of [`DqmModel`].
pub const FORMAT_VERSION: u32 = 1;

/// Learned parameters of one seasonal group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    /// Mean scaling applied to simulated values before mapping.
    pub scaling: f64,
    /// Quantiles of the scaled training simulation, ascending.
    pub hist_q: Vec<f64>,
    /// Factor mapping each `hist_q` anchor onto the observed quantile.
    pub af: Vec<f64>,
}

impl GroupParams {
    /// Interpolated adjustment factor at `x`.
    ///
    /// Linear between the two bracketing anchors, constant beyond the first
    /// and last anchor. When several anchors share the value `x`, the lowest
    /// one's factor is used.
    pub fn factor_at(&self, x: f64) -> f64 {
        let q = &self.hist_q;
        let last = q.len() - 1;
        if x <= q[0] {
            return self.af[0];
        }
        if x > q[last] {
            return self.af[last];
        }
        let first_ge = q.partition_point(|&h| h < x);
        if q[first_ge] == x {
            return self.af[first_ge];
        }
        // q[first_ge - 1] < x < q[first_ge]
        let lo = first_ge - 1;
        let hi = first_ge;
        let w = (x - q[lo]) / (q[hi] - q[lo]);
        self.af[lo] + w * (self.af[hi] - self.af[lo])
    }
}

/// A trained detrended quantile-mapping model.
///
/// Immutable once trained. Group keys are days of year (1..=365) or months
/// (1..=12) depending on [`Grouping`]; groups without training data are
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqmModel {
    format_version: u32,
    kind: Kind,
    grouping: Grouping,
    n_quantiles: usize,
    nodes: Vec<f64>,
    n_train: usize,
    groups: BTreeMap<u16, GroupParams>,
}

impl DqmModel {
    pub(crate) fn new(
        kind: Kind,
        grouping: Grouping,
        nodes: Vec<f64>,
        n_train: usize,
        groups: BTreeMap<u16, GroupParams>,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            kind,
            grouping,
            n_quantiles: nodes.len(),
            nodes,
            n_train,
            groups,
        }
    }

    pub fn format_version(&self) -> u32 {
        self.format_version
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn n_quantiles(&self) -> usize {
        self.n_quantiles
    }

    /// Probability levels of the quantile anchors.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Number of training pairs the model was fitted on.
    pub fn n_train(&self) -> usize {
        self.n_train
    }

    /// Parameters of one group, if it was trained.
    pub fn group(&self, key: u16) -> Option<&GroupParams> {
        self.groups.get(&key)
    }

    /// Keys of all trained groups, ascending.
    pub fn trained_groups(&self) -> Vec<u16> {
        self.groups.keys().copied().collect()
    }

    /// Serializes the model as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, QuantileMapError> {
        serde_json::to_string_pretty(self).map_err(|e| QuantileMapError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Parses a model from JSON, rejecting unknown format versions and
    /// inconsistent group parameters.
    pub fn from_json(json: &str) -> Result<Self, QuantileMapError> {
        let model: DqmModel =
            serde_json::from_str(json).map_err(|e| QuantileMapError::Serialization {
                reason: e.to_string(),
            })?;
        if model.format_version != FORMAT_VERSION {
            return Err(QuantileMapError::UnsupportedFormat {
                found: model.format_version,
                expected: FORMAT_VERSION,
            });
        }
        model
            .check()
            .map_err(|reason| QuantileMapError::Serialization { reason })?;
        Ok(model)
    }

    /// Checks that the parameters can be used by [`crate::adjust`].
    fn check(&self) -> Result<(), String> {
        let n = self.n_quantiles;
        if n == 0 {
            return Err("n_quantiles must be >= 1".to_string());
        }
        if self.nodes.len() != n {
            return Err(format!("{} nodes, expected {n}", self.nodes.len()));
        }
        for (key, g) in &self.groups {
            if !self.grouping.all_groups().contains(key) {
                return Err(format!("group key {key} is out of range"));
            }
            if g.hist_q.len() != n || g.af.len() != n {
                return Err(format!(
                    "group {key} holds {} anchors and {} factors, expected {n}",
                    g.hist_q.len(),
                    g.af.len()
                ));
            }
            if !g.scaling.is_finite() {
                return Err(format!("group {key} has a non-finite scaling"));
            }
            if g.hist_q.iter().chain(g.af.iter()).any(|v| !v.is_finite()) {
                return Err(format!("group {key} has non-finite anchors or factors"));
            }
            if g.hist_q.windows(2).any(|w| w[0] > w[1]) {
                return Err(format!("group {key} anchors are not ascending"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(hist_q: Vec<f64>, af: Vec<f64>) -> GroupParams {
        GroupParams {
            scaling: 1.0,
            hist_q,
            af,
        }
    }

    #[test]
    fn factor_interpolates_between_anchors() {
        let g = params(vec![1.0, 3.0], vec![2.0, 4.0]);
        assert_relative_eq!(g.factor_at(2.0), 3.0);
        assert_relative_eq!(g.factor_at(1.5), 2.5);
    }

    #[test]
    fn factor_clamps_outside_range() {
        let g = params(vec![1.0, 3.0], vec![2.0, 4.0]);
        assert_relative_eq!(g.factor_at(0.1), 2.0);
        assert_relative_eq!(g.factor_at(99.0), 4.0);
        assert_relative_eq!(g.factor_at(3.0), 4.0);
    }

    #[test]
    fn repeated_anchors_use_lowest() {
        let g = params(vec![1.0, 2.0, 2.0, 2.0, 5.0], vec![1.0, 0.5, 0.7, 0.9, 2.0]);
        assert_relative_eq!(g.factor_at(2.0), 0.5);
        // Just above the flat run interpolates from its last anchor.
        assert_relative_eq!(g.factor_at(3.5), 0.9 + 0.5 * 1.1, epsilon = 1e-12);
        assert!(g.factor_at(1.999).is_finite());
    }

    #[test]
    fn single_anchor_is_constant() {
        let g = params(vec![2.0], vec![1.5]);
        assert_relative_eq!(g.factor_at(0.5), 1.5);
        assert_relative_eq!(g.factor_at(2.0), 1.5);
        assert_relative_eq!(g.factor_at(8.0), 1.5);
    }

    #[test]
    fn from_json_rejects_future_version() {
        let model = DqmModel::new(
            Kind::Multiplicative,
            Grouping::Month,
            vec![0.5],
            3,
            BTreeMap::from([(6, params(vec![2.0], vec![1.0]))]),
        );
        let json = model
            .to_json()
            .unwrap()
            .replace("\"format_version\": 1", "\"format_version\": 2");
        assert_eq!(
            DqmModel::from_json(&json).unwrap_err(),
            QuantileMapError::UnsupportedFormat {
                found: 2,
                expected: 1
            }
        );
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            DqmModel::from_json("{not json"),
            Err(QuantileMapError::Serialization { .. })
        ));
    }

    fn month_model() -> DqmModel {
        DqmModel::new(
            Kind::Multiplicative,
            Grouping::Month,
            vec![0.25, 0.75],
            8,
            BTreeMap::from([(6, params(vec![2.0, 5.0], vec![1.1, 0.9]))]),
        )
    }

    /// Re-encodes `model` after editing its JSON tree.
    fn edited(model: &DqmModel, edit: impl FnOnce(&mut serde_json::Value)) -> String {
        let mut value: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();
        edit(&mut value);
        value.to_string()
    }

    fn assert_rejected(json: &str, needle: &str) {
        match DqmModel::from_json(json) {
            Err(QuantileMapError::Serialization { reason }) => {
                assert!(reason.contains(needle), "unexpected reason: {reason}")
            }
            other => panic!("expected a serialization error, got {other:?}"),
        }
    }

    #[test]
    fn from_json_accepts_consistent_model() {
        let model = month_model();
        assert_eq!(DqmModel::from_json(&model.to_json().unwrap()).unwrap(), model);
    }

    #[test]
    fn from_json_rejects_zero_quantiles() {
        let empty = DqmModel::new(
            Kind::Multiplicative,
            Grouping::Month,
            Vec::new(),
            3,
            BTreeMap::from([(6, params(Vec::new(), Vec::new()))]),
        );
        assert_rejected(&empty.to_json().unwrap(), "n_quantiles");
    }

    #[test]
    fn from_json_rejects_node_count_mismatch() {
        let json = edited(&month_model(), |v| v["nodes"] = serde_json::json!([0.5]));
        assert_rejected(&json, "nodes");
    }

    #[test]
    fn from_json_rejects_descending_anchors() {
        let json = edited(&month_model(), |v| {
            v["groups"]["6"]["hist_q"] = serde_json::json!([5.0, 2.0])
        });
        assert_rejected(&json, "not ascending");
    }

    #[test]
    fn from_json_rejects_out_of_range_key() {
        let json = edited(&month_model(), |v| {
            let g = v["groups"]["6"].clone();
            v["groups"]["13"] = g;
        });
        assert_rejected(&json, "out of range");
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut model = month_model();
        if let Some(g) = model.groups.get_mut(&6) {
            g.scaling = f64::NAN;
        }
        assert!(model.check().unwrap_err().contains("scaling"));

        let mut model = month_model();
        if let Some(g) = model.groups.get_mut(&6) {
            g.af[1] = f64::INFINITY;
        }
        assert!(model.check().unwrap_err().contains("non-finite"));

        // JSON has no encoding for NaN; a null in its place fails to parse.
        let json = edited(&month_model(), |v| v["groups"]["6"]["scaling"] = serde_json::Value::Null);
        assert!(matches!(
            DqmModel::from_json(&json),
            Err(QuantileMapError::Serialization { .. })
        ));
    }

    #[test]
    fn from_json_rejects_anchor_count_mismatch() {
        let model = DqmModel::new(
            Kind::Additive,
            Grouping::Month,
            vec![0.25, 0.75],
            4,
            BTreeMap::from([(1, params(vec![2.0], vec![1.0]))]),
        );
        let json = model.to_json().unwrap();
        assert!(matches!(
            DqmModel::from_json(&json),
            Err(QuantileMapError::Serialization { .. })
        ));
    }
}
