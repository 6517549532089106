//! Low-level CSV row formatting.

use std::fs::File;
use std::path::Path;

use hydrobias_metrics::Metrics;

use crate::error::IoError;

/// Creates a CSV writer at `path`, creating parent directories as needed.
pub(crate) fn create(path: &Path) -> Result<csv::Writer<File>, IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(csv::Writer::from_path(path)?)
}

/// Formats an optional value; missing is the empty cell.
pub(crate) fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// The metric cells of a row, in [`Metrics::NAMES`] order.
pub(crate) fn metric_cells(metrics: &Metrics) -> impl Iterator<Item = String> {
    metrics.values().into_iter().map(cell)
}
