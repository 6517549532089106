//! Error types for the hydrobias-crossval crate.

use hydrobias_metrics::MetricsError;
use hydrobias_quantile_map::QuantileMapError;
use hydrobias_series::SeriesError;

/// Error type for all fallible operations in the hydrobias-crossval crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CrossvalError {
    /// Alignment or input validation error.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Quantile-mapping training or adjustment error.
    #[error(transparent)]
    QuantileMap(#[from] QuantileMapError),

    /// Metric evaluation error.
    #[error(transparent)]
    Metrics(#[from] MetricsError),

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a gauge has no aligned observed/simulated overlap.
    #[error("gauge {gauge_id} has no overlapping observed and simulated data")]
    NoData {
        /// Gauge identifier.
        gauge_id: u32,
    },
}
