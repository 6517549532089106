//! Cross-validation configuration.

use hydrobias_metrics::MetricsConfig;
use hydrobias_quantile_map::QmConfig;
use serde::{Deserialize, Serialize};

use crate::error::CrossvalError;

/// How years are partitioned into folds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum SplitScheme {
    /// Each valid year is held out once; all other valid years train.
    #[default]
    Loocv,
    /// A block of `train_years` consecutive valid years trains, the next
    /// `test_years` valid years test; the window advances one year at a time.
    SlidingWindow { train_years: usize, test_years: usize },
}

/// Configuration for [`cross_validate`](crate::cross_validate).
///
/// # Example
///
/// ```
/// use hydrobias_crossval::{CvConfig, SplitScheme};
///
/// let config = CvConfig::new()
///     .with_quantiles(vec![1, 10, 20])
///     .with_scheme(SplitScheme::SlidingWindow { train_years: 5, test_years: 1 });
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CvConfig {
    quantiles: Vec<usize>,
    min_valid_days: usize,
    scheme: SplitScheme,
    qm: QmConfig,
    metrics: MetricsConfig,
}

impl CvConfig {
    /// Creates a configuration with defaults.
    ///
    /// Defaults: `quantiles = [1, 5, 10, 15, 20]`, `min_valid_days = 90`,
    /// `scheme = Loocv`, default [`QmConfig`] and [`MetricsConfig`].
    pub fn new() -> Self {
        Self {
            quantiles: vec![1, 5, 10, 15, 20],
            min_valid_days: 90,
            scheme: SplitScheme::default(),
            qm: QmConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }

    /// Sets the candidate quantile counts.
    pub fn with_quantiles(mut self, quantiles: Vec<usize>) -> Self {
        self.quantiles = quantiles;
        self
    }

    /// Sets the coverage threshold: a year is valid with more than this many days.
    pub fn with_min_valid_days(mut self, days: usize) -> Self {
        self.min_valid_days = days;
        self
    }

    /// Sets the split scheme.
    pub fn with_scheme(mut self, scheme: SplitScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the DQM template; its quantile count is replaced per grid cell.
    pub fn with_qm(mut self, qm: QmConfig) -> Self {
        self.qm = qm;
        self
    }

    /// Sets the metric evaluation configuration.
    pub fn with_metrics(mut self, metrics: MetricsConfig) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn quantiles(&self) -> &[usize] {
        &self.quantiles
    }

    pub fn min_valid_days(&self) -> usize {
        self.min_valid_days
    }

    pub fn scheme(&self) -> SplitScheme {
        self.scheme
    }

    pub fn qm(&self) -> &QmConfig {
        &self.qm
    }

    pub fn metrics(&self) -> &MetricsConfig {
        &self.metrics
    }

    /// Validates this configuration and the nested ones.
    pub fn validate(&self) -> Result<(), CrossvalError> {
        if self.quantiles.is_empty() {
            return Err(CrossvalError::InvalidConfig {
                reason: "at least one quantile count is required".to_string(),
            });
        }
        if let Some(q) = self.quantiles.iter().find(|&&q| q == 0) {
            return Err(CrossvalError::InvalidConfig {
                reason: format!("quantile counts must be >= 1, got {q}"),
            });
        }
        if let SplitScheme::SlidingWindow {
            train_years,
            test_years,
        } = self.scheme
            && (train_years == 0 || test_years == 0)
        {
            return Err(CrossvalError::InvalidConfig {
                reason: format!(
                    "sliding window needs train_years and test_years >= 1, got {train_years} and {test_years}"
                ),
            });
        }
        self.qm.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

impl Default for CvConfig {
    fn default() -> Self {
        Self::new()
    }
}
