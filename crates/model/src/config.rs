//! Model and calibration configuration.

use chrono::NaiveDateTime;
use gwref_series::Alignment;

use crate::calibration::Method;
use crate::error::ModelError;
use crate::style::Style;

/// Settings shared by every calibration in a model.
///
/// Defaults: linear regression, time-equivalent alignment with a zero-day
/// offset, at least 2 aligned samples, 95 % prediction interval.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    method: Method,
    alignment: Alignment,
    min_overlap: usize,
    confidence: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            alignment: Alignment::default(),
            min_overlap: 2,
            confidence: 0.95,
        }
    }
}

impl CalibrationConfig {
    /// Sets the regression method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the time alignment policy.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the minimum number of aligned samples.
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap;
        self
    }

    /// Sets the prediction-interval confidence level.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn min_overlap(&self) -> usize {
        self.min_overlap
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Validates this configuration.
    ///
    /// `min_overlap` must be at least 2 (the prediction interval needs one
    /// degree of freedom), `confidence` must lie in (0, 1), and alignment
    /// widths must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.min_overlap < 2 {
            return Err(ModelError::InvalidConfig {
                reason: format!("min_overlap must be at least 2, got {}", self.min_overlap),
            });
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ModelError::InvalidConfig {
                reason: format!("confidence must be in (0, 1), got {}", self.confidence),
            });
        }
        self.alignment
            .validate()
            .map_err(|e| ModelError::InvalidConfig {
                reason: e.to_string(),
            })
    }
}

/// Configuration of a [`Model`](crate::Model).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelConfig {
    time_origin: NaiveDateTime,
    default_style: Style,
    calibration: CalibrationConfig,
}

impl ModelConfig {
    /// Sets the anchor of the elapsed-day axis (default: 1970-01-01T00:00:00).
    pub fn with_time_origin(mut self, origin: NaiveDateTime) -> Self {
        self.time_origin = origin;
        self
    }

    /// Sets the style new wells start from.
    pub fn with_default_style(mut self, style: Style) -> Self {
        self.default_style = style;
        self
    }

    /// Sets the calibration settings.
    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    /// Returns the time origin.
    pub fn time_origin(&self) -> NaiveDateTime {
        self.time_origin
    }

    /// Returns the default well style.
    pub fn default_style(&self) -> &Style {
        &self.default_style
    }

    /// Returns the calibration settings.
    pub fn calibration(&self) -> &CalibrationConfig {
        &self.calibration
    }

    /// Validates the calibration settings and the default style.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.default_style
            .validate()
            .map_err(|e| ModelError::InvalidConfig {
                reason: format!("default style: {e}"),
            })?;
        self.calibration.validate()
    }
}
