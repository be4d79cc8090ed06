//! Error types for the gwref-stats crate.

/// Error type for all fallible operations in the gwref-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when a regression is requested without any predictor.
    #[error("regression needs at least one predictor")]
    NoPredictors,

    /// Returned when a predictor and the response differ in length.
    #[error("length mismatch: predictor {index} has {got} values, response has {expected}")]
    LengthMismatch {
        /// Zero-based index of the offending predictor.
        index: usize,
        /// Length of the response.
        expected: usize,
        /// Length of the predictor.
        got: usize,
    },

    /// Returned when there are too few observations for the number of
    /// coefficients being estimated.
    #[error("insufficient data: {n} observation(s), need at least {required}")]
    InsufficientData {
        /// Number of observations supplied.
        n: usize,
        /// Minimum number of observations required.
        required: usize,
    },

    /// Returned when an input contains NaN or infinite values.
    #[error("non-finite value at row {row}")]
    NonFinite {
        /// Zero-based row of the first non-finite value.
        row: usize,
    },

    /// Returned when the normal equations cannot be solved, e.g. a constant
    /// predictor or two collinear predictors.
    #[error("singular design matrix: {reason}")]
    Singular {
        /// Description of the degeneracy.
        reason: String,
    },

    /// Returned when a probability lies outside the open interval (0, 1).
    #[error("invalid probability: {p} (must be in (0, 1))")]
    InvalidProbability {
        /// The rejected probability.
        p: f64,
    },

    /// Wraps a failure constructing a statrs distribution.
    ///
    /// Stored as a `String` because statrs errors are not `Clone`.
    #[error("distribution error: {reason}")]
    Distribution {
        /// Description of the underlying failure.
        reason: String,
    },
}
