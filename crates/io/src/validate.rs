//! Accumulated row-level validation.
//!
//! Provides [`ValidationCollector`] for gathering every unparseable row of a
//! gauge file into a single [`IoError::Validation`].

use crate::error::IoError;

/// Number of messages kept verbatim in the error details.
const MAX_DETAILS: usize = 10;

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
///
/// Create a collector, push zero or more error messages, then call
/// [`finish`](Self::finish) to obtain `Ok(())` when everything is valid or a
/// single `Err` that summarises every violation.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// `details` joins the first messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let count = self.errors.len();
        let mut details = self
            .errors
            .into_iter()
            .take(MAX_DETAILS)
            .collect::<Vec<_>>()
            .join("; ");
        if count > MAX_DETAILS {
            details.push_str(&format!("; and {} more", count - MAX_DETAILS));
        }
        Err(IoError::Validation { count, details })
    }
}
