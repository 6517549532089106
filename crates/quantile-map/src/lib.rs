//! Detrended quantile mapping (DQM) for bias correction of simulated discharge.
//!
//! A model learns, per seasonal group, how the distribution of simulated
//! flows departs from the observed one and corrects new simulated values by
//! mapping them through that relation while keeping their short-term trend.
//!
//! # Pipeline
//!
//! 1. **Train** per group: mean scaling, quantile anchors of the scaled
//!    simulation, and factors mapping those anchors onto observed quantiles
//! 2. **Adjust** per group: scale → detrend → interpolate factor → retrend
//! 3. **Persist** the parameters as versioned JSON and reload them later
//!
//! # Glossary
//!
//! - **Group**: a no-leap day-of-year with a centred window, or a calendar month
//! - **Anchor**: a simulated quantile `hist_q[k]` at probability `(k - ½)/n`
//! - **Factor**: ratio (multiplicative) or difference (additive) between the
//!   observed and simulated quantile at an anchor
//!
//! # Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use hydrobias_quantile_map::{Grouping, QmConfig, adjust, train};
//!
//! let dates: Vec<NaiveDate> = (1..=10)
//!     .map(|d| NaiveDate::from_ymd_opt(2000, 6, d).unwrap())
//!     .collect();
//! let obs: Vec<f64> = (1..=10).map(f64::from).collect();
//! let sim: Vec<f64> = obs.iter().map(|v| v * 1.5).collect();
//!
//! let config = QmConfig::new().with_n_quantiles(5).with_grouping(Grouping::Month);
//! let model = train(&obs, &sim, &dates, &config).unwrap();
//! let corrected = adjust(&model, &sim, &dates).unwrap();
//! assert!((corrected[4] - obs[4]).abs() < 1e-9);
//! ```

mod config;
mod error;
pub(crate) mod fit;
mod grouping;
mod model;
pub(crate) mod transform;

pub use config::{Grouping, Kind, QmConfig};
pub use error::QuantileMapError;
pub use fit::train;
pub use model::{DqmModel, FORMAT_VERSION, GroupParams};
pub use transform::adjust;
