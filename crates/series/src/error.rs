//! Error types for the gwref-series crate.

use crate::timestamp::{TimeMode, Timestamp};

/// Error type for all fallible operations in the gwref-series crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    /// Returned when a sample is added at a timestamp already present.
    /// Existing samples are never overwritten silently.
    #[error("duplicate timestamp: {timestamp}")]
    DuplicateTimestamp {
        /// The timestamp that is already present.
        timestamp: Timestamp,
    },

    /// Returned when a timestamp kind does not match the series mode.
    #[error("time mode mismatch: series is {expected}, got {got} timestamp")]
    ModeMismatch {
        /// The series' time mode.
        expected: TimeMode,
        /// The mode of the rejected timestamp.
        got: TimeMode,
    },

    /// Returned when a sample value is NaN or infinite.
    #[error("non-finite value {value} at {timestamp}")]
    NonFiniteValue {
        /// Timestamp of the rejected sample.
        timestamp: Timestamp,
        /// The rejected value.
        value: f64,
    },

    /// Returned when an elapsed timestamp is NaN or infinite.
    #[error("non-finite elapsed time: {value}")]
    NonFiniteTime {
        /// The rejected elapsed offset.
        value: f64,
    },

    /// Returned when a strict slice contains no samples.
    #[error("no samples in range {start} ..= {end}")]
    EmptyRange {
        /// Inclusive lower bound.
        start: Timestamp,
        /// Inclusive upper bound.
        end: Timestamp,
    },

    /// Returned when alignment parameters are invalid.
    #[error("invalid alignment: {reason}")]
    InvalidAlignment {
        /// Description of the problem.
        reason: String,
    },
}
