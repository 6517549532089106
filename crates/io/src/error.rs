//! Error types for hydrobias-io.

use std::path::PathBuf;

use hydrobias_quantile_map::QuantileMapError;

/// Error type for all fallible operations in the hydrobias-io crate.
///
/// Format-specific failures from `csv`, `parquet`, `arrow` and `serde_json`
/// are carried as strings so the error stays independent of those crates'
/// types.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Filesystem failure other than a missing file.
    #[error("io error: {reason}")]
    Io {
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the csv library.
    #[error("csv error: {reason}")]
    Csv {
        /// Description of the underlying csv failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps a JSON encoding or decoding failure.
    #[error("json error: {reason}")]
    Json {
        /// Description of the underlying serde_json failure.
        reason: String,
    },

    /// Returned when none of a column's accepted names is in the header.
    #[error("none of the columns {} found in {}", candidates.join(", "), path.display())]
    MissingColumn {
        /// Accepted header names, in lookup order.
        candidates: Vec<String>,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned when one or more rows cannot be parsed.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// A stored model could not be decoded or is of another format version.
    #[error(transparent)]
    Model(#[from] QuantileMapError),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for IoError {
    fn from(e: csv::Error) -> Self {
        IoError::Csv {
            reason: e.to_string(),
        }
    }
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        IoError::Json {
            reason: e.to_string(),
        }
    }
}
