//! Low-level CSV reading: header lookup and cell parsing.

use std::fs::File;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::error::IoError;

/// Date-time layouts accepted for simulation timestamps, tried in order.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Opens a headed CSV file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, or
/// [`IoError::Csv`] if the header cannot be read.
pub(crate) fn open(path: &Path) -> Result<(csv::Reader<File>, StringRecord), IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    Ok((reader, headers))
}

/// Index of the first of `candidates` present in `headers`.
pub(crate) fn find_column(
    headers: &StringRecord,
    candidates: &[String],
    path: &Path,
) -> Result<usize, IoError> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
        .ok_or_else(|| IoError::MissingColumn {
            candidates: candidates.to_vec(),
            path: path.to_path_buf(),
        })
}

/// Parses an ISO calendar date, ignoring any time part.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, DATE_FORMAT).map_err(|e| format!("invalid date '{s}': {e}"))
}

/// Parses a timestamp; a bare date means midnight.
pub(crate) fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("invalid timestamp '{s}'"))
}

/// Parses a discharge cell. An empty cell is `None`.
pub(crate) fn parse_value(s: &str) -> Result<Option<f64>, String> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid value '{s}'"))
}
