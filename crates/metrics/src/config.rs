//! Metric evaluation configuration.

use crate::error::MetricsError;

/// Configuration for [`evaluate`](crate::evaluate).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    min_samples: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { min_samples: 10 }
    }
}

impl MetricsConfig {
    /// Creates a configuration with the default minimum of 10 pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum number of valid pairs required to score a series.
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Returns the minimum number of valid pairs.
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Validates this configuration.
    ///
    /// At least two pairs are needed for any variance-based metric.
    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.min_samples < 2 {
            return Err(MetricsError::InvalidConfig {
                reason: format!("min_samples must be >= 2, got {}", self.min_samples),
            });
        }
        Ok(())
    }
}
