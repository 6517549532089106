//! Error types for the hydrobias-series crate.

/// Error type for all fallible operations in the hydrobias-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a month number is outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month value.
        month: u8,
    },

    /// Returned when a year range has its start after its end.
    #[error("invalid year range: {start}..={end}")]
    InvalidYearRange {
        /// First year of the range.
        start: i32,
        /// Last year of the range.
        end: i32,
    },

    /// Returned when an alignment parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when one or more input records fail validation.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of offending records.
        count: usize,
        /// Summary of the first offending records.
        details: String,
    },
}
