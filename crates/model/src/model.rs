//! The model: a named, insertion-ordered collection of wells.

use std::path::{Path, PathBuf};

use gwref_series::{Alignment, TimeSeries, Timestamp, align, count_pairs};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::calibration::{Calibration, CalibrationReport, Deviation};
use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::persist;
use crate::style::StyleValue;
use crate::well::{PlotView, Role, Well, first_repeat};

/// A groundwater project: wells keyed by unique name, in insertion order,
/// plus the shared [`ModelConfig`].
///
/// Every regressor a well declares names another well of the same model.
/// Changing a well's series drops its own calibration and the calibration of
/// every well that uses it as a regressor.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    name: String,
    config: ModelConfig,
    wells: IndexMap<String, Well>,
}

impl Model {
    /// Creates an empty model with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: ModelConfig::default(),
            wells: IndexMap::new(),
        }
    }

    /// Creates an empty model with `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] if `config` fails validation.
    pub fn with_config(name: impl Into<String>, config: ModelConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            name: name.into(),
            config,
            wells: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Number of wells.
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.wells.contains_key(name)
    }

    // --- Membership ---

    /// Adds a well.
    ///
    /// Any calibration the well carries is dropped; calibrations are only
    /// produced inside the model.
    ///
    /// # Errors
    ///
    /// - [`ModelError::DuplicateWellName`] if the name is taken; the existing
    ///   well is kept.
    /// - [`ModelError::NonFiniteAttribute`], [`ModelError::InvalidStyleValue`]
    ///   or [`ModelError::Series`] for a non-finite location, depth or style
    ///   number, or a calibration period outside the series' time mode.
    /// - [`ModelError::SelfReference`], [`ModelError::DuplicateRegressor`] or
    ///   [`ModelError::UnknownRegressor`] for a bad regressor declaration.
    pub fn add_well(&mut self, mut well: Well) -> Result<(), ModelError> {
        if self.wells.contains_key(well.name()) {
            return Err(ModelError::DuplicateWellName {
                name: well.name().to_string(),
            });
        }
        well.check_attributes()?;
        self.check_regressors(well.name(), well.regressors())?;
        well.clear_calibration();

        info!(
            well = %well.name(),
            role = %well.role(),
            samples = well.series().len(),
            "added well"
        );
        self.wells.insert(well.name().to_string(), well);
        Ok(())
    }

    /// Creates an empty well seeded with the model default style.
    ///
    /// # Errors
    ///
    /// [`ModelError::EmptyName`] or [`ModelError::DuplicateWellName`].
    pub fn create_well(&mut self, name: impl Into<String>, role: Role) -> Result<&Well, ModelError> {
        let well = Well::new(name, role)?.with_style(self.config.default_style().clone());
        let name = well.name().to_string();
        self.add_well(well)?;
        self.get_well(&name)
    }

    /// Removes a well and returns it.
    ///
    /// Wells that declared it as a regressor drop it from their regressor
    /// list and lose their calibration.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WellNotFound`] if absent.
    pub fn remove_well(&mut self, name: &str) -> Result<Well, ModelError> {
        let removed = self
            .wells
            .shift_remove(name)
            .ok_or_else(|| not_found(name))?;

        for well in self.wells.values_mut() {
            if well.regressors().iter().any(|r| r == name) {
                let kept = well
                    .regressors()
                    .iter()
                    .filter(|r| r.as_str() != name)
                    .cloned()
                    .collect();
                well.set_regressors(kept);
                debug!(well = %well.name(), removed = %name, "dropped regressor");
            }
        }

        info!(well = %name, "removed well");
        Ok(removed)
    }

    /// Looks up a well by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::WellNotFound`] if absent.
    pub fn get_well(&self, name: &str) -> Result<&Well, ModelError> {
        self.wells.get(name).ok_or_else(|| not_found(name))
    }

    /// All wells in insertion order.
    pub fn wells(&self) -> impl ExactSizeIterator<Item = &Well> + '_ {
        self.wells.values()
    }

    /// All well names in insertion order.
    pub fn well_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.wells.keys().map(String::as_str)
    }

    pub fn observation_wells(&self) -> impl Iterator<Item = &Well> + '_ {
        self.wells.values().filter(|w| w.role() == Role::Observation)
    }

    pub fn reference_wells(&self) -> impl Iterator<Item = &Well> + '_ {
        self.wells.values().filter(|w| w.role() == Role::Reference)
    }

    // --- Well attributes ---

    /// Updates style options of a well; see [`Well::set_kwargs`].
    ///
    /// # Errors
    ///
    /// [`ModelError::WellNotFound`], [`ModelError::UnknownStyleOption`] or
    /// [`ModelError::InvalidStyleValue`].
    pub fn set_kwargs<I, K, V>(&mut self, name: &str, options: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<StyleValue>,
    {
        self.well_mut(name)?.set_kwargs(options)
    }

    /// # Errors
    ///
    /// [`ModelError::WellNotFound`] or [`ModelError::NonFiniteAttribute`].
    pub fn set_location(&mut self, name: &str, x: f64, y: f64) -> Result<(), ModelError> {
        self.well_mut(name)?.set_location(x, y)
    }

    /// # Errors
    ///
    /// [`ModelError::WellNotFound`] or [`ModelError::NonFiniteAttribute`].
    pub fn set_depth(&mut self, name: &str, depth: f64) -> Result<(), ModelError> {
        self.well_mut(name)?.set_depth(depth)
    }

    /// Declares the regressors of a well, dropping its calibration.
    ///
    /// # Errors
    ///
    /// [`ModelError::WellNotFound`], [`ModelError::SelfReference`],
    /// [`ModelError::DuplicateRegressor`] or [`ModelError::UnknownRegressor`].
    pub fn set_regressors<I, S>(&mut self, name: &str, regressors: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regressors: Vec<String> = regressors.into_iter().map(Into::into).collect();
        self.get_well(name)?;
        self.check_regressors(name, &regressors)?;
        self.well_mut(name)?.set_regressors(regressors);
        Ok(())
    }

    /// Sets or clears the calibration window of a well, dropping its
    /// calibration.
    ///
    /// # Errors
    ///
    /// [`ModelError::WellNotFound`], or [`ModelError::Series`] when a bound
    /// does not match the well's time mode or is not finite.
    pub fn set_calibration_period(
        &mut self,
        name: &str,
        period: Option<(Timestamp, Timestamp)>,
    ) -> Result<(), ModelError> {
        self.well_mut(name)?.set_calibration_period(period)
    }

    // --- Series ---

    /// Replaces the series of a well.
    pub fn load_series(&mut self, name: &str, series: TimeSeries) -> Result<(), ModelError> {
        self.well_mut(name)?.load_series(series);
        self.invalidate_dependents(name);
        Ok(())
    }

    /// Appends samples to a well (all-or-nothing).
    pub fn extend_series<I, T>(&mut self, name: &str, samples: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Timestamp>,
    {
        self.well_mut(name)?.extend_series(samples)?;
        self.invalidate_dependents(name);
        Ok(())
    }

    /// Inserts one sample into a well.
    pub fn add_sample(
        &mut self,
        name: &str,
        timestamp: impl Into<Timestamp>,
        value: f64,
    ) -> Result<(), ModelError> {
        self.well_mut(name)?.add_sample(timestamp, value)?;
        self.invalidate_dependents(name);
        Ok(())
    }

    // --- Calibration ---

    /// Declares `regressors` for well `name` and calibrates it.
    ///
    /// On error the well keeps its previous declaration and calibration.
    ///
    /// # Errors
    ///
    /// [`ModelError::WellNotFound`] / [`ModelError::UnknownRegressor`] for
    /// missing wells, otherwise as [`Well::fit`].
    pub fn calibrate(&mut self, name: &str, regressors: &[&str]) -> Result<&Calibration, ModelError> {
        let calibration = self.fit(name, regressors)?;
        let names = regressors.iter().map(|r| r.to_string()).collect();
        debug!(
            well = %name,
            regressors = ?regressors,
            r_squared = calibration.r_squared(),
            pred_const = calibration.pred_const(),
            "calibrated well"
        );
        self.store(name, names, calibration)
    }

    /// Calibrates every observation well against its declared regressors,
    /// in insertion order. One well failing does not stop the others.
    pub fn calibrate_all(&mut self) -> CalibrationReport {
        let targets: Vec<(String, Vec<String>)> = self
            .observation_wells()
            .map(|w| (w.name().to_string(), w.regressors().to_vec()))
            .collect();

        let mut report = CalibrationReport::default();
        for (name, regressors) in targets {
            let result = if regressors.is_empty() {
                Err(ModelError::NoRegressors { well: name.clone() })
            } else {
                let refs: Vec<&str> = regressors.iter().map(String::as_str).collect();
                self.calibrate(&name, &refs).map(|_| ())
            };
            match result {
                Ok(()) => report.push_success(&name),
                Err(e) => {
                    warn!(well = %name, error = %e, "calibration failed");
                    report.push_failure(&name, e);
                }
            }
        }

        info!(
            succeeded = report.succeeded().len(),
            failed = report.failed().len(),
            "calibrated model"
        );
        report
    }

    /// Calibrates well `name` against each candidate reference well on its
    /// own and keeps the calibration with the lowest RMSE.
    ///
    /// The winner becomes the well's only declared regressor.
    ///
    /// # Errors
    ///
    /// [`ModelError::NoRegressors`] if `candidates` is empty; if every
    /// candidate fails, the first candidate's error.
    pub fn best_fit(&mut self, name: &str, candidates: &[&str]) -> Result<&Calibration, ModelError> {
        let mut best: Option<(&str, Calibration)> = None;
        let mut first_error = None;

        for &candidate in candidates {
            match self.fit(name, &[candidate]) {
                Ok(c) => {
                    debug!(well = %name, candidate, rmse = c.rmse(), "candidate fit");
                    if best.as_ref().is_none_or(|(_, b)| c.rmse() < b.rmse()) {
                        best = Some((candidate, c));
                    }
                }
                Err(e) => {
                    debug!(well = %name, candidate, error = %e, "candidate rejected");
                    first_error.get_or_insert(e);
                }
            }
        }

        match (best, first_error) {
            (Some((winner, calibration)), _) => {
                info!(well = %name, winner, rmse = calibration.rmse(), "selected best fit");
                self.store(name, vec![winner.to_string()], calibration)
            }
            (None, Some(e)) => Err(e),
            (None, None) => Err(ModelError::NoRegressors {
                well: name.to_string(),
            }),
        }
    }

    /// Compares the whole observation record of a calibrated well with the
    /// levels predicted from its regressors.
    ///
    /// One entry per observation sample where every regressor aligns; the
    /// calibration period does not apply here.
    ///
    /// # Errors
    ///
    /// [`ModelError::WellNotFound`] or [`ModelError::NotCalibrated`].
    pub fn deviations(&self, name: &str) -> Result<Vec<Deviation>, ModelError> {
        let well = self.get_well(name)?;
        let calibration = well.calibration().ok_or_else(|| ModelError::NotCalibrated {
            well: name.to_string(),
        })?;
        let regressors = calibration
            .regressors()
            .iter()
            .map(|r| self.get_well(r).map(Well::series))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = align(
            well.series(),
            &regressors,
            calibration.alignment(),
            self.config.time_origin(),
        )
        .map_err(|e| ModelError::series(name, e))?;

        let deviations = (0..rows.len())
            .filter_map(|i| {
                let predicted = calibration.predict(&rows.row(i))?;
                let residual = rows.response[i] - predicted;
                Some(Deviation {
                    timestamp: rows.timestamps[i],
                    observed: rows.response[i],
                    predicted,
                    residual,
                    outside: residual.abs() > calibration.pred_const(),
                })
            })
            .collect::<Vec<_>>();

        debug!(
            well = %name,
            compared = deviations.len(),
            outside = deviations.iter().filter(|d| d.outside).count(),
            "computed deviations"
        );
        Ok(deviations)
    }

    /// Number of time-equivalent pairs between two wells for each offset
    /// (days), over their full records.
    pub fn count_pairs(
        &self,
        name: &str,
        regressor: &str,
        offsets_days: &[f64],
    ) -> Result<Vec<(f64, usize)>, ModelError> {
        let target = self.get_well(name)?;
        let other = self.get_well(regressor)?;
        count_pairs(
            target.series(),
            other.series(),
            offsets_days,
            self.config.time_origin(),
        )
        .map_err(|e| ModelError::series(name, e))
    }

    /// Alignment policy used for new calibrations.
    pub fn alignment(&self) -> Alignment {
        self.config.calibration().alignment()
    }

    /// Read-only rendering view of one well.
    pub fn plot_series(&self, name: &str) -> Result<PlotView<'_>, ModelError> {
        Ok(self.get_well(name)?.plot_view())
    }

    // --- Persistence ---

    /// Writes the model to a `.gwref` file and returns the path written.
    ///
    /// Calibration outputs are not stored; regressor declarations and
    /// calibration periods are, so [`Model::calibrate_all`] restores them
    /// after [`Model::load`].
    pub fn save(&self, path: &Path) -> Result<PathBuf, ModelError> {
        let written = gwref_io::write_project(path, &persist::to_document(self))?;
        info!(model = %self.name, path = %written.display(), "saved model");
        Ok(written)
    }

    /// Reads a model from a `.gwref` file.
    ///
    /// # Errors
    ///
    /// [`ModelError::Persistence`]; any inconsistency in the file is
    /// reported as `CorruptFile` and no partial model is returned.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let doc = gwref_io::read_project(path)?;
        let model = persist::from_document(doc, path)?;
        info!(model = %model.name, wells = model.len(), "loaded model");
        Ok(model)
    }

    // --- Internals ---

    fn well_mut(&mut self, name: &str) -> Result<&mut Well, ModelError> {
        self.wells.get_mut(name).ok_or_else(|| not_found(name))
    }

    fn check_regressors(&self, name: &str, regressors: &[String]) -> Result<(), ModelError> {
        if regressors.iter().any(|r| r == name) {
            return Err(ModelError::SelfReference {
                well: name.to_string(),
            });
        }
        if let Some(repeated) = first_repeat(regressors.iter().map(String::as_str)) {
            return Err(ModelError::DuplicateRegressor {
                well: name.to_string(),
                regressor: repeated.to_string(),
            });
        }
        if let Some(missing) = regressors.iter().find(|r| !self.wells.contains_key(r.as_str())) {
            return Err(ModelError::UnknownRegressor {
                well: name.to_string(),
                regressor: missing.clone(),
            });
        }
        Ok(())
    }

    fn fit(&self, name: &str, regressors: &[&str]) -> Result<Calibration, ModelError> {
        let well = self.get_well(name)?;
        if regressors.contains(&name) {
            return Err(ModelError::SelfReference {
                well: name.to_string(),
            });
        }
        let others = regressors
            .iter()
            .map(|r| {
                self.wells.get(*r).ok_or_else(|| ModelError::UnknownRegressor {
                    well: name.to_string(),
                    regressor: r.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        well.fit(&others, self.config.calibration(), self.config.time_origin())
    }

    fn store(
        &mut self,
        name: &str,
        regressors: Vec<String>,
        calibration: Calibration,
    ) -> Result<&Calibration, ModelError> {
        let well = self.well_mut(name)?;
        well.store_calibration(regressors, calibration);
        well.calibration().ok_or_else(|| ModelError::NotCalibrated {
            well: name.to_string(),
        })
    }

    /// Drops calibrations that used `name` as a regressor.
    fn invalidate_dependents(&mut self, name: &str) {
        for well in self.wells.values_mut() {
            let depends = well
                .calibration()
                .is_some_and(|c| c.regressors().iter().any(|r| r == name));
            if depends && well.clear_calibration() {
                debug!(well = %well.name(), changed = %name, "invalidated calibration");
            }
        }
    }
}

fn not_found(name: &str) -> ModelError {
    ModelError::WellNotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_well(name: &str, role: Role, base: f64) -> Well {
        let series =
            TimeSeries::elapsed((0..10).map(|i| (i as f64, base + 0.1 * i as f64))).unwrap();
        Well::new(name, role).unwrap().with_series(series)
    }

    fn model() -> Model {
        let mut m = Model::new("test");
        m.add_well(linear_well("OW1", Role::Observation, 10.0)).unwrap();
        m.add_well(linear_well("RW1", Role::Reference, 5.0)).unwrap();
        m
    }

    #[test]
    fn duplicate_name_keeps_first() {
        let mut m = model();
        let err = m
            .add_well(linear_well("OW1", Role::Reference, 0.0))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateWellName { .. }));
        assert_eq!(m.get_well("OW1").unwrap().role(), Role::Observation);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn add_well_checks_declared_regressors() {
        let mut m = model();
        let w = Well::new("OW2", Role::Observation)
            .unwrap()
            .with_regressors(["RW9"]);
        assert!(matches!(
            m.add_well(w),
            Err(ModelError::UnknownRegressor { .. })
        ));
        let w = Well::new("OW2", Role::Observation)
            .unwrap()
            .with_regressors(["OW2"]);
        assert!(matches!(
            m.add_well(w),
            Err(ModelError::SelfReference { .. })
        ));
    }

    #[test]
    fn insertion_order_is_kept() {
        let mut m = model();
        m.create_well("A", Role::Reference).unwrap();
        let names: Vec<&str> = m.well_names().collect();
        assert_eq!(names, ["OW1", "RW1", "A"]);
        assert_eq!(m.observation_wells().count(), 1);
        assert_eq!(m.reference_wells().count(), 2);
    }

    #[test]
    fn set_regressors_validates() {
        let mut m = model();
        assert!(matches!(
            m.set_regressors("OW1", ["OW1"]),
            Err(ModelError::SelfReference { .. })
        ));
        assert!(matches!(
            m.set_regressors("OW1", ["nope"]),
            Err(ModelError::UnknownRegressor { .. })
        ));
        assert!(matches!(
            m.set_regressors("nope", ["RW1"]),
            Err(ModelError::WellNotFound { .. })
        ));
        m.set_regressors("OW1", ["RW1"]).unwrap();
        assert_eq!(m.get_well("OW1").unwrap().regressors(), ["RW1".to_string()]);
    }

    #[test]
    fn repeated_regressor_rejected_everywhere() {
        let mut m = model();
        assert!(matches!(
            m.set_regressors("OW1", ["RW1", "RW1"]),
            Err(ModelError::DuplicateRegressor { .. })
        ));
        assert!(m.get_well("OW1").unwrap().regressors().is_empty());
        assert!(matches!(
            m.calibrate("OW1", &["RW1", "RW1"]),
            Err(ModelError::DuplicateRegressor { .. })
        ));
        let w = linear_well("OW2", Role::Observation, 3.0).with_regressors(["RW1", "RW1"]);
        assert!(matches!(
            m.add_well(w),
            Err(ModelError::DuplicateRegressor { .. })
        ));
        assert!(!m.contains("OW2"));
    }

    #[test]
    fn non_finite_attributes_never_enter_the_model() {
        let mut m = model();
        let w = linear_well("RW2", Role::Reference, 1.0).with_location(f64::NAN, 1.0);
        assert!(matches!(
            m.add_well(w),
            Err(ModelError::NonFiniteAttribute { attribute: "x", .. })
        ));
        let styled = crate::Style {
            linewidth: f64::INFINITY,
            ..crate::Style::default()
        };
        let w = linear_well("RW2", Role::Reference, 1.0).with_style(styled);
        assert!(matches!(
            m.add_well(w),
            Err(ModelError::InvalidStyleValue { .. })
        ));
        assert!(!m.contains("RW2"));

        assert!(m.set_location("RW1", 1.0, f64::NAN).is_err());
        assert!(m.set_depth("RW1", f64::INFINITY).is_err());
        assert!(m.set_kwargs("RW1", [("alpha", f64::NAN)]).is_err());
        let well = m.get_well("RW1").unwrap();
        assert_eq!(well.location(), (0.0, 0.0));
        assert_eq!(well.depth(), 0.0);
        assert_eq!(well.style().alpha, 1.0);
    }

    #[test]
    fn calibration_period_checked_when_set() {
        let mut m = model();
        let day = chrono::NaiveDateTime::default();
        let err = m
            .set_calibration_period("OW1", Some((Timestamp::Calendar(day), Timestamp::Calendar(day))))
            .unwrap_err();
        assert!(matches!(err, ModelError::Series { .. }));
        assert!(m.get_well("OW1").unwrap().calibration_period().is_none());

        let w = linear_well("OW2", Role::Observation, 3.0)
            .with_calibration_period(Timestamp::Calendar(day), Timestamp::Calendar(day));
        assert!(matches!(m.add_well(w), Err(ModelError::Series { .. })));
    }

    #[test]
    fn failed_calibration_leaves_well_unchanged() {
        let mut m = model();
        m.calibrate("OW1", &["RW1"]).unwrap();
        m.create_well("RW2", Role::Reference).unwrap();
        let err = m.calibrate("OW1", &["RW2"]).unwrap_err();
        assert!(matches!(err, ModelError::InsufficientOverlap { found: 0, .. }));
        let well = m.get_well("OW1").unwrap();
        assert!(well.is_calibrated());
        assert_eq!(well.regressors(), ["RW1".to_string()]);
    }

    #[test]
    fn deviations_require_calibration() {
        let m = model();
        assert!(matches!(
            m.deviations("OW1"),
            Err(ModelError::NotCalibrated { .. })
        ));
    }

    #[test]
    fn create_well_uses_default_style() {
        let mut style = crate::Style::default();
        style.color = Some("gray".into());
        let config = ModelConfig::default().with_default_style(style);
        let mut m = Model::with_config("styled", config).unwrap();
        let w = m.create_well("W", Role::Reference).unwrap();
        assert_eq!(w.style().color.as_deref(), Some("gray"));
        assert!(matches!(
            m.create_well("", Role::Reference),
            Err(ModelError::EmptyName)
        ));
    }
}
