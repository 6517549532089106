//! Results, summary and corrected-series writers.

use std::collections::BTreeMap;
use std::path::Path;

use hydrobias_crossval::{CorrectedValue, GaugeStatus, ResultRow, SummaryRow};
use hydrobias_metrics::Metrics;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use crate::csv_write;
use crate::error::IoError;
use crate::parquet_write;
use crate::validate::ValidationCollector;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level = parquet::basic::ZstdLevel::try_new(3)?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing the results table to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    fn validate(&self) -> Result<(), IoError> {
        let mut c = ValidationCollector::new();
        if self.row_group_size == 0 {
            c.push("row_group_size must be greater than 0");
        }
        c.finish()
    }
}

const RESULT_KEYS: [&str; 4] = ["gauge_id", "type", "quantiles", "fold"];
const SUMMARY_KEYS: [&str; 4] = ["gauge_id", "type", "quantiles", "n_folds"];

/// Write the results table to Parquet.
///
/// Unavailable metrics are written as nulls.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid, or
/// [`IoError::Parquet`] / [`IoError::Io`] if conversion or file I/O fails.
pub fn write_results_parquet(
    path: &Path,
    rows: &[ResultRow],
    config: &WriterConfig,
) -> Result<(), IoError> {
    config.validate()?;

    let schema = parquet_write::build_schema();
    let props = WriterProperties::builder()
        .set_compression(config.compression.to_parquet()?)
        .set_max_row_group_size(config.row_group_size)
        .build();

    let batch = parquet_write::results_to_record_batch(rows, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)?;

    debug!(path = %path.display(), n_rows = rows.len(), "wrote results parquet");
    Ok(())
}

/// Write the results table to CSV.
///
/// Unavailable metrics are written as empty cells.
///
/// # Errors
///
/// Returns [`IoError::Io`] or [`IoError::Csv`] on write failure.
pub fn write_results_csv(path: &Path, rows: &[ResultRow]) -> Result<(), IoError> {
    let mut w = csv_write::create(path)?;
    w.write_record(RESULT_KEYS.iter().chain(Metrics::NAMES.iter()))?;
    for r in rows {
        let keys = [
            r.gauge_id.to_string(),
            r.correction.to_string(),
            r.quantiles_label(),
            r.fold.clone(),
        ];
        w.write_record(keys.into_iter().chain(csv_write::metric_cells(&r.metrics)))?;
    }
    w.flush()?;

    debug!(path = %path.display(), n_rows = rows.len(), "wrote results csv");
    Ok(())
}

/// Write per-setting median metrics to CSV.
///
/// # Errors
///
/// Returns [`IoError::Io`] or [`IoError::Csv`] on write failure.
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<(), IoError> {
    let mut w = csv_write::create(path)?;
    w.write_record(SUMMARY_KEYS.iter().chain(Metrics::NAMES.iter()))?;
    for s in rows {
        let keys = [
            s.gauge_id.to_string(),
            s.correction.to_string(),
            s.quantiles.map_or_else(|| "raw".to_string(), |q| q.to_string()),
            s.n_folds.to_string(),
        ];
        w.write_record(keys.into_iter().chain(csv_write::metric_cells(&s.median)))?;
    }
    w.flush()?;
    Ok(())
}

/// Write a corrected series as `date,q_cor`.
///
/// # Errors
///
/// Returns [`IoError::Io`] or [`IoError::Csv`] on write failure.
pub fn write_corrected_csv(path: &Path, values: &[CorrectedValue]) -> Result<(), IoError> {
    let mut w = csv_write::create(path)?;
    w.write_record(["date", "q_cor"])?;
    for v in values {
        w.write_record([v.date.format("%Y-%m-%d").to_string(), v.q_cor.to_string()])?;
    }
    w.flush()?;

    debug!(path = %path.display(), n_rows = values.len(), "wrote corrected series");
    Ok(())
}

/// Write the per-gauge status of a run as a JSON object keyed by gauge id.
///
/// # Errors
///
/// Returns [`IoError::Json`] or [`IoError::Io`] on failure.
pub fn write_status_json(
    path: &Path,
    statuses: &BTreeMap<u32, GaugeStatus>,
) -> Result<(), IoError> {
    let json = serde_json::to_string_pretty(statuses)?;
    std::fs::write(path, json)?;
    Ok(())
}
