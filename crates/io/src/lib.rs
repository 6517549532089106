//! # hydrobias-io
//!
//! File boundary of hydrobias: read per-gauge discharge tables from CSV,
//! write cross-validation results to CSV and Parquet, and persist trained
//! DQM models as JSON.
//!
//! ## Layout
//!
//! | Path | Content |
//! |------|---------|
//! | `<obs_dir>/<gauge_id>.csv` | `date`, `q_cms` or `value` |
//! | `<sim_dir>/<gauge_id>.csv` | `datetime` or `date`, `q_raw` or `value` |
//! | `<models_dir>/<gauge_id>_dqm.json` | versioned model parameters |
//! | results CSV / Parquet | `gauge_id`, `type`, `quantiles`, `fold`, metric columns |
//!
//! Unavailable metrics are written as empty CSV cells and Parquet nulls.

mod csv_read;
mod csv_write;
mod error;
mod model_store;
mod parquet_write;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use model_store::ModelStore;
pub use reader::{ReaderConfig, gauge_path, read_gauge, read_observations, read_simulations};
pub use writer::{
    Compression, WriterConfig, write_corrected_csv, write_results_csv, write_results_parquet,
    write_status_json, write_summary_csv,
};
