//! Reading per-gauge discharge tables.

use std::path::{Path, PathBuf};

use hydrobias_crossval::GaugeInput;
use hydrobias_series::{Observation, SimulatedValue};
use tracing::debug;

use crate::csv_read;
use crate::error::IoError;
use crate::validate::ValidationCollector;

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Column names accepted when reading gauge tables.
///
/// Each value column lists its accepted names in lookup order; the first
/// one present in the header is used. The [`Default`] implementation
/// accepts `date` + `q_cms`/`value` for observations and
/// `datetime`/`date` + `q_raw`/`value` for simulations.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    obs_date_columns: Vec<String>,
    obs_value_columns: Vec<String>,
    sim_time_columns: Vec<String>,
    sim_value_columns: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            obs_date_columns: vec!["date".into()],
            obs_value_columns: vec!["q_cms".into(), "value".into()],
            sim_time_columns: vec!["datetime".into(), "date".into()],
            sim_value_columns: vec!["q_raw".into(), "value".into()],
        }
    }
}

impl ReaderConfig {
    /// Set the accepted names of the observed discharge column.
    pub fn with_obs_value_columns(mut self, names: Vec<String>) -> Self {
        self.obs_value_columns = names;
        self
    }

    /// Set the accepted names of the simulated discharge column.
    pub fn with_sim_value_columns(mut self, names: Vec<String>) -> Self {
        self.sim_value_columns = names;
        self
    }

    /// Set the accepted names of the simulation timestamp column.
    pub fn with_sim_time_columns(mut self, names: Vec<String>) -> Self {
        self.sim_time_columns = names;
        self
    }

    /// Validate that every column has at least one accepted name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] listing each empty name list.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        for (what, names) in [
            ("observation date", &self.obs_date_columns),
            ("observation value", &self.obs_value_columns),
            ("simulation time", &self.sim_time_columns),
            ("simulation value", &self.sim_value_columns),
        ] {
            if names.is_empty() {
                c.push(format!("{what} column needs at least one name"));
            }
        }
        c.finish()
    }
}

/// Path of a gauge's table inside `dir`: `<dir>/<gauge_id>.csv`.
pub fn gauge_path(dir: &Path, gauge_id: u32) -> PathBuf {
    dir.join(format!("{gauge_id}.csv"))
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read an observed-discharge table.
///
/// Empty value cells become missing observations. Every unparseable row is
/// reported in one [`IoError::Validation`].
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::MissingColumn`],
/// [`IoError::Csv`] or [`IoError::Validation`].
pub fn read_observations(path: &Path, config: &ReaderConfig) -> Result<Vec<Observation>, IoError> {
    config.validate()?;
    let (mut reader, headers) = csv_read::open(path)?;
    let date_col = csv_read::find_column(&headers, &config.obs_date_columns, path)?;
    let value_col = csv_read::find_column(&headers, &config.obs_value_columns, path)?;

    let mut out = Vec::new();
    let mut c = ValidationCollector::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let date = csv_read::parse_date(record.get(date_col).unwrap_or(""));
        let value = csv_read::parse_value(record.get(value_col).unwrap_or(""));
        match (date, value) {
            (Ok(date), Ok(value)) => out.push(Observation::new(date, value)),
            (Err(e), _) | (_, Err(e)) => c.push(format!("line {line}: {e}")),
        }
    }
    c.finish()?;

    debug!(path = %path.display(), n_rows = out.len(), "read observations");
    Ok(out)
}

/// Read a simulated-discharge table.
///
/// Timestamps may be date-times or bare dates. Rows with an empty value are
/// skipped.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`], [`IoError::MissingColumn`],
/// [`IoError::Csv`] or [`IoError::Validation`].
pub fn read_simulations(
    path: &Path,
    config: &ReaderConfig,
) -> Result<Vec<SimulatedValue>, IoError> {
    config.validate()?;
    let (mut reader, headers) = csv_read::open(path)?;
    let time_col = csv_read::find_column(&headers, &config.sim_time_columns, path)?;
    let value_col = csv_read::find_column(&headers, &config.sim_value_columns, path)?;

    let mut out = Vec::new();
    let mut n_empty = 0usize;
    let mut c = ValidationCollector::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let stamp = csv_read::parse_timestamp(record.get(time_col).unwrap_or(""));
        let value = csv_read::parse_value(record.get(value_col).unwrap_or(""));
        match (stamp, value) {
            (Ok(stamp), Ok(Some(value))) => out.push(SimulatedValue::new(stamp, value)),
            (Ok(_), Ok(None)) => n_empty += 1,
            (Err(e), _) | (_, Err(e)) => c.push(format!("line {line}: {e}")),
        }
    }
    c.finish()?;

    debug!(
        path = %path.display(),
        n_rows = out.len(),
        n_empty,
        "read simulations"
    );
    Ok(out)
}

/// Read both tables of a gauge from `<obs_dir>/<id>.csv` and
/// `<sim_dir>/<id>.csv`.
///
/// # Errors
///
/// Propagates the errors of [`read_observations`] and [`read_simulations`].
pub fn read_gauge(
    obs_dir: &Path,
    sim_dir: &Path,
    gauge_id: u32,
    config: &ReaderConfig,
) -> Result<GaugeInput, IoError> {
    let observations = read_observations(&gauge_path(obs_dir, gauge_id), config)?;
    let simulations = read_simulations(&gauge_path(sim_dir, gauge_id), config)?;
    Ok(GaugeInput {
        gauge_id,
        observations,
        simulations,
    })
}
