//! # hydrobias-crossval
//!
//! Out-of-sample validation of DQM bias correction, and the production
//! train/correct workflow built on the same pieces.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["GaugeInput"] -->|"align()"| B["AlignedSeries"]
//!     B -->|"make_folds()"| C["Vec of Fold"]
//!     C --> D["cross_validate()"]
//!     D -->|"train() + adjust() + evaluate()"| E["GaugeReport"]
//!     E -->|"summarize()"| F["Vec of SummaryRow"]
//!     G["Vec of GaugeInput"] -->|"run_batch() (rayon)"| H["Vec of GaugeReport"]
//! ```
//!
//! Each fold contributes one `Raw` row scoring the uncorrected test
//! simulation and one `DQM` row per candidate quantile count. A failing DQM
//! cell is logged and skipped; a gauge without data or without enough valid
//! years reports a status instead of rows.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `split` | Valid years, LOOCV and sliding-window folds |
//! | `crossval` | Per-gauge fold × quantile grid |
//! | `batch` | Parallel driver over gauges |
//! | `summary` | Median metrics across folds |
//! | `production` | Production model training and operational correction |
//! | `config` | Cross-validation configuration |
//! | `error` | Error types |

mod batch;
mod config;
mod crossval;
mod error;
mod production;
mod split;
mod summary;

pub use batch::{GaugeInput, run_batch, run_gauge};
pub use config::{CvConfig, SplitScheme};
pub use crossval::{Correction, GaugeReport, GaugeStatus, ResultRow, cross_validate};
pub use error::CrossvalError;
pub use production::{
    CorrectedSeries, CorrectedValue, CorrectionConfig, correct_series, train_gauge,
};
pub use split::{
    Fold, FoldLabel, loocv_folds, make_folds, sliding_window_folds, valid_years,
};
pub use summary::{SummaryRow, summarize};
