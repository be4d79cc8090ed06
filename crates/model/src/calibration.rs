//! Calibration results and reports.

use std::fmt;
use std::str::FromStr;

use gwref_series::{AlignedRows, Alignment, Timestamp};
use gwref_stats::{LinearFit, pearson_correlation, prediction_constant};

use crate::error::ModelError;

/// Regression method used for a calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Ordinary least squares on one or more reference wells.
    #[default]
    Linear,
}

impl Method {
    /// Canonical name used in files and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ModelError;

    /// Accepts `linear`, `linearregression` and `linear_regression` in any
    /// case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "linearregression" | "linear_regression" => Ok(Self::Linear),
            _ => Err(ModelError::UnknownMethod {
                name: s.to_string(),
            }),
        }
    }
}

/// Outputs of a completed calibration of one observation well.
///
/// The fitted relation is
/// `level = intercept + sum(coefficients[j] * regressor_j)`; samples whose
/// residual magnitude exceeds [`pred_const`](Self::pred_const) fall outside
/// the prediction interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    method: Method,
    regressors: Vec<String>,
    alignment: Alignment,
    intercept: f64,
    coefficients: Vec<f64>,
    r_squared: f64,
    correlation: Option<f64>,
    rmse: f64,
    stderr: f64,
    t_a: f64,
    pred_const: f64,
    confidence: f64,
    timestamps: Vec<Timestamp>,
    observed: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

/// How a calibration was requested.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FitSettings {
    pub(crate) method: Method,
    pub(crate) alignment: Alignment,
    pub(crate) confidence: f64,
}

impl Calibration {
    /// Assembles a calibration from a regression over `rows`.
    ///
    /// A fit with no residual degrees of freedom gets `stderr = 0`.
    pub(crate) fn from_fit(
        well: &str,
        regressors: Vec<String>,
        settings: FitSettings,
        rows: AlignedRows,
        fit: LinearFit,
    ) -> Result<Self, ModelError> {
        let stderr = fit.residual_std_error().unwrap_or(0.0);
        let (pred_const, t_a) = prediction_constant(settings.confidence, fit.n(), stderr)
            .map_err(|e| ModelError::Regression {
                well: well.to_string(),
                reason: e.to_string(),
            })?;
        let correlation = match rows.predictors.as_slice() {
            [only] => pearson_correlation(only, &rows.response),
            _ => pearson_correlation(&rows.response, fit.fitted()),
        };

        Ok(Self {
            method: settings.method,
            regressors,
            alignment: settings.alignment,
            intercept: fit.intercept(),
            coefficients: fit.coefficients().to_vec(),
            r_squared: fit.r_squared(),
            correlation,
            rmse: fit.rmse(),
            stderr,
            t_a,
            pred_const,
            confidence: settings.confidence,
            timestamps: rows.timestamps,
            observed: rows.response,
            fitted: fit.fitted().to_vec(),
            residuals: fit.residuals().to_vec(),
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Regressor well names, in coefficient order.
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    /// Alignment policy used to pair samples.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// One slope per regressor.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Coefficient of determination (1.0 for a constant observed series).
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Correlation coefficient of the fit.
    ///
    /// With one regressor this is the signed Pearson r between regressor and
    /// observed levels; with several it is the multiple correlation R between
    /// observed and fitted levels. `None` below three samples or when either
    /// side is constant.
    pub fn correlation(&self) -> Option<f64> {
        self.correlation
    }

    /// Root mean square of the residuals.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Residual standard error, `sqrt(SSR / (n - k - 1))`.
    pub fn stderr(&self) -> f64 {
        self.stderr
    }

    /// Number of aligned samples used.
    pub fn n(&self) -> usize {
        self.observed.len()
    }

    /// Two-sided Student-t critical value with `n - 1` degrees of freedom.
    pub fn t_a(&self) -> f64 {
        self.t_a
    }

    /// Half-width of the prediction interval.
    pub fn pred_const(&self) -> f64 {
        self.pred_const
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Observation timestamps of the aligned samples.
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn observed(&self) -> &[f64] {
        &self.observed
    }

    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Evaluates the fitted relation for one value per regressor.
    ///
    /// Returns `None` if `values` has the wrong length.
    pub fn predict(&self, values: &[f64]) -> Option<f64> {
        if values.len() != self.coefficients.len() {
            return None;
        }
        Some(
            self.intercept
                + self
                    .coefficients
                    .iter()
                    .zip(values)
                    .map(|(b, x)| b * x)
                    .sum::<f64>(),
        )
    }

    /// Lower and upper prediction-interval bounds around `predicted`.
    pub fn interval(&self, predicted: f64) -> (f64, f64) {
        (predicted - self.pred_const, predicted + self.pred_const)
    }
}

/// One observation compared against its calibrated prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    /// Observation timestamp.
    pub timestamp: Timestamp,
    /// Measured level.
    pub observed: f64,
    /// Level predicted from the reference wells.
    pub predicted: f64,
    /// `observed - predicted`.
    pub residual: f64,
    /// `true` if `|residual|` exceeds the prediction constant.
    pub outside: bool,
}

/// Outcome of [`Model::calibrate_all`](crate::Model::calibrate_all).
///
/// Wells are listed in model insertion order.
#[derive(Debug, Default)]
pub struct CalibrationReport {
    succeeded: Vec<String>,
    failed: Vec<(String, ModelError)>,
}

impl CalibrationReport {
    pub(crate) fn push_success(&mut self, well: &str) {
        self.succeeded.push(well.to_string());
    }

    pub(crate) fn push_failure(&mut self, well: &str, error: ModelError) {
        self.failed.push((well.to_string(), error));
    }

    /// Wells calibrated successfully.
    pub fn succeeded(&self) -> &[String] {
        &self.succeeded
    }

    /// Wells that failed, with the reason.
    pub fn failed(&self) -> &[(String, ModelError)] {
        &self.failed
    }

    /// Returns `true` if no well failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Converts the report into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Calibration`] summarising every failure, joined
    /// with `"; "`.
    pub fn into_result(self) -> Result<Vec<String>, ModelError> {
        if self.failed.is_empty() {
            return Ok(self.succeeded);
        }
        let details = self
            .failed
            .iter()
            .map(|(well, e)| format!("{well}: {e}"))
            .collect::<Vec<_>>()
            .join("; ");
        Err(ModelError::Calibration {
            count: self.failed.len(),
            details,
        })
    }
}
