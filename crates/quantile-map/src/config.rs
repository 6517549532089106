//! Configuration for detrended quantile mapping.

use serde::{Deserialize, Serialize};

use crate::error::QuantileMapError;

/// How learned factors combine with simulated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Factors are differences, `corrected = sim + factor`.
    Additive,
    /// Factors are ratios, `corrected = sim * factor`. Requires positive data.
    #[default]
    Multiplicative,
}

impl Kind {
    /// Applies a factor: `value * factor` or `value + factor`.
    pub fn apply(self, value: f64, factor: f64) -> f64 {
        match self {
            Kind::Additive => value + factor,
            Kind::Multiplicative => value * factor,
        }
    }

    /// The factor that maps `from` onto `to`: `to / from` or `to - from`.
    pub fn factor(self, to: f64, from: f64) -> f64 {
        match self {
            Kind::Additive => to - from,
            Kind::Multiplicative => to / from,
        }
    }

    /// Removes a factor: `value / factor` or `value - factor`.
    pub fn remove(self, value: f64, factor: f64) -> f64 {
        match self {
            Kind::Additive => value - factor,
            Kind::Multiplicative => value / factor,
        }
    }

    /// The factor that leaves a value unchanged.
    pub fn identity(self) -> f64 {
        match self {
            Kind::Additive => 0.0,
            Kind::Multiplicative => 1.0,
        }
    }
}

/// Seasonal partitioning of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Grouping {
    /// One group per no-leap day-of-year; members lie within `window / 2`
    /// days of the group's day on a 365-day circle. `window` must be odd.
    DayOfYear { window: u16 },
    /// One group per calendar month.
    Month,
}

impl Default for Grouping {
    fn default() -> Self {
        Grouping::DayOfYear { window: 31 }
    }
}

/// Configuration for DQM training.
///
/// # Example
///
/// ```
/// use hydrobias_quantile_map::{Grouping, Kind, QmConfig};
///
/// let config = QmConfig::new()
///     .with_n_quantiles(15)
///     .with_grouping(Grouping::Month)
///     .with_kind(Kind::Multiplicative);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct QmConfig {
    n_quantiles: usize,
    grouping: Grouping,
    kind: Kind,
}

impl QmConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `n_quantiles = 20`, `grouping = DayOfYear { window: 31 }`,
    /// `kind = Multiplicative`.
    pub fn new() -> Self {
        Self {
            n_quantiles: 20,
            grouping: Grouping::default(),
            kind: Kind::default(),
        }
    }

    /// Sets the number of quantile anchors per group.
    pub fn with_n_quantiles(mut self, n: usize) -> Self {
        self.n_quantiles = n;
        self
    }

    /// Sets the seasonal grouping.
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the correction kind.
    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    pub fn n_quantiles(&self) -> usize {
        self.n_quantiles
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Validates this configuration.
    ///
    /// `n_quantiles` must be at least 1 and a day-of-year window must be odd
    /// and lie in `1..=365`.
    pub fn validate(&self) -> Result<(), QuantileMapError> {
        if self.n_quantiles < 1 {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!("n_quantiles must be >= 1, got {}", self.n_quantiles),
            });
        }
        if let Grouping::DayOfYear { window } = self.grouping
            && !(1..=365).contains(&window)
        {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!("day-of-year window must be in 1..=365, got {window}"),
            });
        }
        if let Grouping::DayOfYear { window } = self.grouping
            && window % 2 == 0
        {
            return Err(QuantileMapError::InvalidConfig {
                reason: format!("day-of-year window must be odd, got {window}"),
            });
        }
        Ok(())
    }
}

impl Default for QmConfig {
    fn default() -> Self {
        Self::new()
    }
}
