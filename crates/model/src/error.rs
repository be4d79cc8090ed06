//! Error types for the gwref-model crate.

use gwref_io::IoError;
use gwref_series::SeriesError;

use crate::well::Role;

/// Error type for all fallible operations in the gwref-model crate.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Returned when a well is created with an empty name.
    #[error("well name must not be empty")]
    EmptyName,

    /// Returned when adding a well whose name is already taken.
    #[error("well '{name}' already exists")]
    DuplicateWellName {
        /// The clashing name.
        name: String,
    },

    /// Returned when a named well is not in the model.
    #[error("well '{name}' not found")]
    WellNotFound {
        /// The requested name.
        name: String,
    },

    /// Returned when a well declares a regressor the model does not contain.
    #[error("well '{well}' declares unknown regressor '{regressor}'")]
    UnknownRegressor {
        /// Well declaring the regressor.
        well: String,
        /// Missing regressor name.
        regressor: String,
    },

    /// Returned when a regressor is listed more than once.
    #[error("well '{well}' lists regressor '{regressor}' more than once")]
    DuplicateRegressor {
        /// Well declaring the regressors.
        well: String,
        /// The repeated name.
        regressor: String,
    },

    /// Returned when a well is listed as its own regressor.
    #[error("well '{well}' cannot be its own regressor")]
    SelfReference {
        /// The offending well.
        well: String,
    },

    /// Returned when a well has the wrong role for the requested operation.
    #[error("well '{well}' is a {found} well, expected {expected}")]
    RoleMismatch {
        /// The offending well.
        well: String,
        /// Role the operation needs.
        expected: Role,
        /// Role the well has.
        found: Role,
    },

    /// Returned when calibrating a well without regressors.
    #[error("well '{well}' has no regressors")]
    NoRegressors {
        /// The well being calibrated.
        well: String,
    },

    /// Returned when too few samples align for a calibration.
    #[error("insufficient overlap for '{well}': {found} aligned sample(s), need at least {required}")]
    InsufficientOverlap {
        /// The well being calibrated.
        well: String,
        /// Number of aligned rows.
        found: usize,
        /// Minimum required.
        required: usize,
    },

    /// Returned when calibration outputs are requested for an uncalibrated
    /// well.
    #[error("well '{well}' is not calibrated")]
    NotCalibrated {
        /// The well queried.
        well: String,
    },

    /// Returned when a coordinate or depth is NaN or infinite.
    #[error("{attribute} of well '{well}' must be finite, got {value}")]
    NonFiniteAttribute {
        /// The well being updated.
        well: String,
        /// `"x"`, `"y"` or `"depth"`.
        attribute: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Returned when a style option name is not recognised.
    #[error("unknown style option '{key}' for well '{well}'")]
    UnknownStyleOption {
        /// Well being styled (empty for the model default style).
        well: String,
        /// The unrecognised key.
        key: String,
    },

    /// Returned when a style value has the wrong kind.
    #[error("invalid value for style option '{option}' of well '{well}': expected {expected}")]
    InvalidStyleValue {
        /// Well being styled (empty for the model default style).
        well: String,
        /// Option name.
        option: String,
        /// Expected kind ("text" or "number").
        expected: String,
    },

    /// Returned when a regression method name is not recognised.
    #[error("unknown regression method '{name}'")]
    UnknownMethod {
        /// The unrecognised name.
        name: String,
    },

    /// Returned when a configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Wraps a time-series error together with the well it came from.
    #[error("series error in well '{well}': {source}")]
    Series {
        /// Well owning the series.
        well: String,
        /// Underlying series error.
        #[source]
        source: SeriesError,
    },

    /// Returned when the regression itself fails, e.g. a constant regressor.
    #[error("regression failed for well '{well}': {reason}")]
    Regression {
        /// The well being calibrated.
        well: String,
        /// Description of the numeric failure.
        reason: String,
    },

    /// Returned by [`CalibrationReport::into_result`](crate::CalibrationReport::into_result)
    /// when one or more wells failed.
    #[error("{count} calibration failure(s): {details}")]
    Calibration {
        /// Number of failed wells.
        count: usize,
        /// Summary of the failures.
        details: String,
    },

    /// Wraps a persistence failure.
    #[error(transparent)]
    Persistence(#[from] IoError),
}

impl ModelError {
    pub(crate) fn series(well: &str, source: SeriesError) -> Self {
        ModelError::Series {
            well: well.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_duplicate_well_name() {
        let e = ModelError::DuplicateWellName { name: "W1".into() };
        assert_eq!(e.to_string(), "well 'W1' already exists");
    }

    #[test]
    fn display_role_mismatch() {
        let e = ModelError::RoleMismatch {
            well: "ref".into(),
            expected: Role::Observation,
            found: Role::Reference,
        };
        assert_eq!(
            e.to_string(),
            "well 'ref' is a reference well, expected observation"
        );
    }

    #[test]
    fn display_insufficient_overlap() {
        let e = ModelError::InsufficientOverlap {
            well: "obs".into(),
            found: 1,
            required: 2,
        };
        assert_eq!(
            e.to_string(),
            "insufficient overlap for 'obs': 1 aligned sample(s), need at least 2"
        );
    }

    #[test]
    fn display_duplicate_regressor() {
        let e = ModelError::DuplicateRegressor {
            well: "obs".into(),
            regressor: "RW1".into(),
        };
        assert_eq!(e.to_string(), "well 'obs' lists regressor 'RW1' more than once");
    }

    #[test]
    fn display_non_finite_attribute() {
        let e = ModelError::NonFiniteAttribute {
            well: "RW1".into(),
            attribute: "depth",
            value: f64::INFINITY,
        };
        assert_eq!(e.to_string(), "depth of well 'RW1' must be finite, got inf");
    }

    #[test]
    fn display_unknown_style_option() {
        let e = ModelError::UnknownStyleOption {
            well: "obs".into(),
            key: "colour".into(),
        };
        assert_eq!(e.to_string(), "unknown style option 'colour' for well 'obs'");
    }

    #[test]
    fn display_calibration() {
        let e = ModelError::Calibration {
            count: 2,
            details: "a: no regressors; b: no regressors".into(),
        };
        assert_eq!(
            e.to_string(),
            "2 calibration failure(s): a: no regressors; b: no regressors"
        );
    }

    #[test]
    fn series_error_is_source() {
        use std::error::Error;
        let e = ModelError::series("obs", SeriesError::NonFiniteTime { value: f64::NAN });
        assert!(e.source().is_some());
        assert!(e.to_string().starts_with("series error in well 'obs'"));
    }

    #[test]
    fn persistence_is_transparent() {
        let e: ModelError = IoError::Serialization {
            reason: "boom".into(),
        }
        .into();
        assert_eq!(e.to_string(), "serialization error: boom");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<ModelError>();
    }
}
