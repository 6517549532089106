//! # hydrobias-series
//!
//! Daily discharge records and their alignment into observed/simulated pairs.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Vec of SimulatedValue"] -->|"aggregate_daily()"| B["Vec of DailyValue"]
//!     B -->|"shift_back()"| C["shifted daily sim"]
//!     D["Vec of Observation"] --> E["align()"]
//!     C --> E
//!     E --> F["AlignedSeries"]
//!     F -->|".select_years()"| F
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use hydrobias_series::{AlignConfig, Observation, SimulatedValue, align};
//!
//! let day = NaiveDate::from_ymd_opt(1985, 6, 1).unwrap();
//! let obs = vec![Observation::new(day, Some(42.0))];
//! let sim = vec![SimulatedValue::new(
//!     day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap(),
//!     55.0,
//! )];
//!
//! let series = align(&obs, &sim, &AlignConfig::new()).unwrap();
//! assert_eq!(series.len(), 1);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `discharge` | Raw observation and simulation records, daily aggregation |
//! | `align` | Date alignment, season and year filtering |
//! | `aligned` | The validated pair series |
//! | `calendar` | Month/year ranges and no-leap day-of-year |
//! | `error` | Error types |

mod align;
mod aligned;
mod calendar;
mod discharge;
mod error;
mod validate;

pub use align::{AlignConfig, MAX_SIM_DAY_OFFSET, align};
pub use aligned::{AlignedRecord, AlignedSeries};
pub use calendar::{MonthRange, YearRange, noleap_doy};
pub use discharge::{
    DailyValue, Observation, SimulatedValue, aggregate_daily, prepare_simulation, shift_back,
};
pub use error::SeriesError;
