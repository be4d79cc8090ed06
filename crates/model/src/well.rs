//! Monitoring wells.

use std::fmt;

use chrono::NaiveDateTime;
use gwref_series::{SeriesError, TimeMode, TimeSeries, Timestamp, align};
use gwref_stats::linear_regression;
use tracing::debug;

use crate::calibration::{Calibration, FitSettings};
use crate::config::CalibrationConfig;
use crate::error::ModelError;
use crate::style::{Style, StyleValue};

/// Whether a well is analysed or used as a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Well whose deviations are detected.
    Observation,
    /// Well used as a regressor for observation wells.
    Reference,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A monitoring well: location, water-level series, display style and, for
/// observation wells, its regressors and calibration.
///
/// Inside a [`Model`](crate::Model) a well is only changed through model
/// methods, which keep regressor references valid and drop calibrations that
/// depend on a changed series.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    name: String,
    role: Role,
    x: f64,
    y: f64,
    depth: f64,
    series: TimeSeries,
    style: Style,
    regressors: Vec<String>,
    calibration_period: Option<(Timestamp, Timestamp)>,
    calibration: Option<Calibration>,
}

impl Well {
    /// Creates an empty calendar-mode well at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyName`] if `name` is empty.
    pub fn new(name: impl Into<String>, role: Role) -> Result<Self, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            name,
            role,
            x: 0.0,
            y: 0.0,
            depth: 0.0,
            series: TimeSeries::new(TimeMode::Calendar),
            style: Style::default(),
            regressors: Vec::new(),
            calibration_period: None,
            calibration: None,
        })
    }

    /// Sets the map coordinates. Checked when the well joins a model.
    pub fn with_location(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Sets the well depth. Checked when the well joins a model.
    pub fn with_depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the water-level series.
    pub fn with_series(mut self, series: TimeSeries) -> Self {
        self.load_series(series);
        self
    }

    /// Sets the display style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Declares regressor well names. Checked when the well joins a model.
    pub fn with_regressors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regressors = names.into_iter().map(Into::into).collect();
        self.calibration = None;
        self
    }

    /// Restricts calibration to `start ..= end`.
    pub fn with_calibration_period(mut self, start: Timestamp, end: Timestamp) -> Self {
        self.calibration_period = Some((start, end));
        self.calibration = None;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_reference(&self) -> bool {
        self.role == Role::Reference
    }

    /// Map coordinates `(x, y)`.
    pub fn location(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Declared regressor names, in order.
    pub fn regressors(&self) -> &[String] {
        &self.regressors
    }

    pub fn calibration_period(&self) -> Option<(Timestamp, Timestamp)> {
        self.calibration_period
    }

    /// Outputs of the last successful calibration, if still valid.
    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_some()
    }

    /// Updates style options; see [`Style::set_kwargs`].
    ///
    /// # Errors
    ///
    /// [`ModelError::UnknownStyleOption`] or [`ModelError::InvalidStyleValue`];
    /// the style is unchanged on error.
    pub fn set_kwargs<I, K, V>(&mut self, options: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        self.style
            .set_kwargs(options)
            .map_err(|e| e.for_well(&self.name))
    }

    /// Moves the well.
    ///
    /// # Errors
    ///
    /// [`ModelError::NonFiniteAttribute`] for a NaN or infinite coordinate;
    /// the location is unchanged.
    pub fn set_location(&mut self, x: f64, y: f64) -> Result<(), ModelError> {
        self.check_finite("x", x)?;
        self.check_finite("y", y)?;
        self.x = x;
        self.y = y;
        Ok(())
    }

    /// # Errors
    ///
    /// [`ModelError::NonFiniteAttribute`] for a NaN or infinite depth.
    pub fn set_depth(&mut self, depth: f64) -> Result<(), ModelError> {
        self.check_finite("depth", depth)?;
        self.depth = depth;
        Ok(())
    }

    /// Replaces the series and clears this well's calibration.
    pub fn load_series(&mut self, series: TimeSeries) {
        self.series = series;
        self.calibration = None;
    }

    /// Appends samples (all-or-nothing) and clears this well's calibration.
    ///
    /// # Errors
    ///
    /// [`ModelError::Series`] if any sample is rejected; nothing changes.
    pub fn extend_series<I, T>(&mut self, samples: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Timestamp>,
    {
        self.series
            .extend(samples)
            .map_err(|e| ModelError::series(&self.name, e))?;
        self.calibration = None;
        Ok(())
    }

    /// Inserts one sample and clears this well's calibration.
    ///
    /// # Errors
    ///
    /// [`ModelError::Series`] on a duplicate, mode mismatch or non-finite
    /// input.
    pub fn add_sample(
        &mut self,
        timestamp: impl Into<Timestamp>,
        value: f64,
    ) -> Result<(), ModelError> {
        self.series
            .add_sample(timestamp, value)
            .map_err(|e| ModelError::series(&self.name, e))?;
        self.calibration = None;
        Ok(())
    }

    pub(crate) fn set_regressors(&mut self, names: Vec<String>) {
        self.regressors = names;
        self.calibration = None;
    }

    pub(crate) fn set_calibration_period(
        &mut self,
        period: Option<(Timestamp, Timestamp)>,
    ) -> Result<(), ModelError> {
        self.check_period(period)?;
        self.calibration_period = period;
        self.calibration = None;
        Ok(())
    }

    /// Checks everything a builder may have set without validation:
    /// location, depth, style and calibration period.
    pub(crate) fn check_attributes(&self) -> Result<(), ModelError> {
        self.check_finite("x", self.x)?;
        self.check_finite("y", self.y)?;
        self.check_finite("depth", self.depth)?;
        self.style.validate().map_err(|e| e.for_well(&self.name))?;
        self.check_period(self.calibration_period)
    }

    fn check_finite(&self, attribute: &'static str, value: f64) -> Result<(), ModelError> {
        if !value.is_finite() {
            return Err(ModelError::NonFiniteAttribute {
                well: self.name.clone(),
                attribute,
                value,
            });
        }
        Ok(())
    }

    /// Period bounds must share the series mode and be finite.
    fn check_period(&self, period: Option<(Timestamp, Timestamp)>) -> Result<(), ModelError> {
        let Some((start, end)) = period else {
            return Ok(());
        };
        let mode = self.series.mode();
        for bound in [start, end] {
            let error = if bound.mode() != mode {
                SeriesError::ModeMismatch {
                    expected: mode,
                    got: bound.mode(),
                }
            } else if let Some(d) = bound.as_elapsed().filter(|d| !d.is_finite()) {
                SeriesError::NonFiniteTime { value: d }
            } else {
                continue;
            };
            return Err(ModelError::series(&self.name, error));
        }
        Ok(())
    }

    pub(crate) fn clear_calibration(&mut self) -> bool {
        self.calibration.take().is_some()
    }

    pub(crate) fn store_calibration(&mut self, regressors: Vec<String>, calibration: Calibration) {
        self.regressors = regressors;
        self.calibration = Some(calibration);
    }

    /// Calibrates this well against `regressors` and stores the result.
    ///
    /// The regressor names become this well's declared regressors. On error
    /// the well is left unchanged.
    ///
    /// # Errors
    ///
    /// See [`Well::fit`].
    pub fn calibrate(
        &mut self,
        regressors: &[&Well],
        config: &CalibrationConfig,
        origin: NaiveDateTime,
    ) -> Result<&Calibration, ModelError> {
        let calibration = self.fit(regressors, config, origin)?;
        let names = regressors.iter().map(|w| w.name.clone()).collect();
        self.store_calibration(names, calibration);
        self.calibration
            .as_ref()
            .ok_or_else(|| ModelError::NotCalibrated {
                well: self.name.clone(),
            })
    }

    /// Regresses this well's series on the regressors' series without
    /// storing anything.
    ///
    /// Samples are paired at this well's timestamps with the configured
    /// alignment, restricted to the calibration period when one is set.
    ///
    /// # Errors
    ///
    /// Checked in order:
    /// - [`ModelError::SelfReference`] if this well is among `regressors`.
    /// - [`ModelError::DuplicateRegressor`] if a regressor is listed twice.
    /// - [`ModelError::RoleMismatch`] unless this is an observation well.
    /// - [`ModelError::NoRegressors`] if `regressors` is empty.
    /// - [`ModelError::RoleMismatch`] for a regressor that is not a
    ///   reference well.
    /// - [`ModelError::InvalidConfig`] for an invalid `config`.
    /// - [`ModelError::Series`] if the calibration period does not match the
    ///   series mode.
    /// - [`ModelError::InsufficientOverlap`] if fewer than
    ///   `config.min_overlap()` samples align.
    /// - [`ModelError::Regression`] if the system is singular, e.g. a
    ///   constant regressor.
    pub fn fit(
        &self,
        regressors: &[&Well],
        config: &CalibrationConfig,
        origin: NaiveDateTime,
    ) -> Result<Calibration, ModelError> {
        if regressors.iter().any(|r| r.name == self.name) {
            return Err(ModelError::SelfReference {
                well: self.name.clone(),
            });
        }
        if let Some(name) = first_repeat(regressors.iter().map(|r| r.name.as_str())) {
            return Err(ModelError::DuplicateRegressor {
                well: self.name.clone(),
                regressor: name.to_string(),
            });
        }
        if self.role != Role::Observation {
            return Err(ModelError::RoleMismatch {
                well: self.name.clone(),
                expected: Role::Observation,
                found: self.role,
            });
        }
        if regressors.is_empty() {
            return Err(ModelError::NoRegressors {
                well: self.name.clone(),
            });
        }
        if let Some(r) = regressors.iter().find(|r| r.role != Role::Reference) {
            return Err(ModelError::RoleMismatch {
                well: r.name.clone(),
                expected: Role::Reference,
                found: r.role,
            });
        }
        config.validate()?;

        let target = match self.calibration_period {
            Some((start, end)) => self
                .series
                .range(start, end)
                .map_err(|e| ModelError::series(&self.name, e))?,
            None => self.series.clone(),
        };
        let others: Vec<&TimeSeries> = regressors.iter().map(|r| &r.series).collect();
        let rows = align(&target, &others, config.alignment(), origin)
            .map_err(|e| ModelError::series(&self.name, e))?;

        if rows.len() < config.min_overlap() {
            return Err(ModelError::InsufficientOverlap {
                well: self.name.clone(),
                found: rows.len(),
                required: config.min_overlap(),
            });
        }

        let fit = linear_regression(&rows.predictors, &rows.response).map_err(|e| {
            ModelError::Regression {
                well: self.name.clone(),
                reason: e.to_string(),
            }
        })?;
        debug!(
            well = %self.name,
            n = fit.n(),
            r_squared = fit.r_squared(),
            rmse = fit.rmse(),
            "fitted calibration"
        );

        let settings = FitSettings {
            method: config.method(),
            alignment: config.alignment(),
            confidence: config.confidence(),
        };
        let names = regressors.iter().map(|r| r.name.clone()).collect();
        Calibration::from_fit(&self.name, names, settings, rows, fit)
    }

    /// Read-only view for a rendering collaborator.
    pub fn plot_view(&self) -> PlotView<'_> {
        let fitted = self
            .calibration
            .as_ref()
            .map(|c| {
                c.timestamps()
                    .iter()
                    .copied()
                    .zip(c.fitted().iter().copied())
                    .collect()
            })
            .unwrap_or_default();
        PlotView {
            name: &self.name,
            role: self.role,
            style: &self.style,
            points: self.series.iter().collect(),
            fitted,
            pred_const: self.calibration.as_ref().map(Calibration::pred_const),
        }
    }
}

/// First name that occurs twice, in iteration order.
pub(crate) fn first_repeat<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

/// What a renderer needs to draw one well.
///
/// Points keep the well's own time representation: calendar timestamps for
/// calendar wells, day offsets for elapsed wells.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotView<'a> {
    pub name: &'a str,
    pub role: Role,
    pub style: &'a Style,
    /// Measured `(time, level)` pairs.
    pub points: Vec<(Timestamp, f64)>,
    /// Calibrated `(time, level)` pairs; empty when not calibrated.
    pub fitted: Vec<(Timestamp, f64)>,
    /// Prediction-interval half-width when calibrated.
    pub pred_const: Option<f64>,
}
