//! Metric evaluation error types.

/// Errors that can occur while scoring a simulated series against observations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    /// Too few usable pairs survived the positivity mask.
    #[error("insufficient data: {valid} valid pair(s), at least {required} required")]
    InsufficientData { valid: usize, required: usize },

    /// Observed and simulated arrays differ in length.
    #[error("length mismatch: {obs_len} observed vs {sim_len} simulated values")]
    LengthMismatch { obs_len: usize, sim_len: usize },

    /// Invalid metric configuration.
    #[error("invalid metrics config: {reason}")]
    InvalidConfig { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_display() {
        let err = MetricsError::InsufficientData {
            valid: 9,
            required: 10,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("9 valid pair(s)"));
        assert!(msg.contains("at least 10"));
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = MetricsError::LengthMismatch {
            obs_len: 3,
            sim_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "length mismatch: 3 observed vs 4 simulated values"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MetricsError>();
    }
}
