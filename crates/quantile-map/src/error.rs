//! Error types for the hydrobias-quantile-map crate.

/// Error type for all fallible operations in the hydrobias-quantile-map crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuantileMapError {
    /// Returned when input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when value and date slices differ in length.
    #[error("length mismatch: {what} has {got} elements, expected {expected}")]
    LengthMismatch {
        /// Which input is mismatched.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a value is NaN or infinite.
    #[error("non-finite value {value} at index {index}")]
    NonFiniteValue {
        /// Position in the input slice.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when multiplicative mapping meets a value that is not `> 0`.
    #[error("non-positive value {value} at index {index} (multiplicative mapping needs > 0)")]
    NonPositiveValue {
        /// Position in the input slice.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a configuration parameter is invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a seasonal group has some training data but fewer
    /// points than quantile anchors.
    #[error("group {group} has {n} training value(s), at least {required} required")]
    InsufficientGroupData {
        /// Group key (day-of-year or month).
        group: u16,
        /// Number of training values in the group.
        n: usize,
        /// Required number (the quantile count).
        required: usize,
    },

    /// Returned when a value to adjust falls in a group the model never saw.
    #[error("group {group} was not trained")]
    UntrainedGroup {
        /// Group key (day-of-year or month).
        group: u16,
    },

    /// Returned when a persisted model has an unknown format version.
    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedFormat {
        /// Version found in the document.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// Returned when model (de)serialization fails.
    #[error("model serialization failed: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_data() {
        let e = QuantileMapError::EmptyData;
        assert_eq!(e.to_string(), "input data is empty");
    }

    #[test]
    fn error_length_mismatch() {
        let e = QuantileMapError::LengthMismatch {
            what: "dates",
            expected: 100,
            got: 99,
        };
        assert_eq!(
            e.to_string(),
            "length mismatch: dates has 99 elements, expected 100"
        );
    }

    #[test]
    fn error_non_positive() {
        let e = QuantileMapError::NonPositiveValue {
            index: 3,
            value: 0.0,
        };
        assert_eq!(
            e.to_string(),
            "non-positive value 0 at index 3 (multiplicative mapping needs > 0)"
        );
    }

    #[test]
    fn error_insufficient_group_data() {
        let e = QuantileMapError::InsufficientGroupData {
            group: 152,
            n: 4,
            required: 10,
        };
        assert_eq!(
            e.to_string(),
            "group 152 has 4 training value(s), at least 10 required"
        );
    }

    #[test]
    fn error_untrained_group() {
        let e = QuantileMapError::UntrainedGroup { group: 12 };
        assert_eq!(e.to_string(), "group 12 was not trained");
    }

    #[test]
    fn error_unsupported_format() {
        let e = QuantileMapError::UnsupportedFormat {
            found: 7,
            expected: 1,
        };
        assert_eq!(
            e.to_string(),
            "unsupported model format version 7 (expected 1)"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<QuantileMapError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<QuantileMapError>();
    }
}
