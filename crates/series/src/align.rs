//! Time alignment of regressor series onto an observation series.
//!
//! Every policy works on a common elapsed-day axis: calendar timestamps are
//! converted with the model time origin, elapsed offsets are used as-is. Rows
//! are produced at the observation (target) timestamps only, and a row exists
//! only when every regressor resolves a value for it.

use chrono::NaiveDateTime;

use crate::error::SeriesError;
use crate::series::TimeSeries;
use crate::timestamp::Timestamp;

/// Slack, in days, for window and tolerance comparisons (about 0.1 s).
/// Absorbs the rounding of calendar-to-day conversion.
const AXIS_EPS: f64 = 1e-6;

/// How regressor samples are matched to an observation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// Regressor must have a sample at exactly the same instant.
    Exact,
    /// Nearest regressor sample within `tolerance_days`; ties go to the
    /// earlier sample.
    Nearest {
        /// Maximum distance in days.
        tolerance_days: f64,
    },
    /// Mean of all regressor samples within `±offset_days` of the instant.
    TimeEquivalent {
        /// Half-width of the window in days.
        offset_days: f64,
    },
    /// Linear interpolation between the bracketing regressor samples.
    /// No extrapolation beyond the regressor record.
    Linear,
}

impl Default for Alignment {
    fn default() -> Self {
        Self::TimeEquivalent { offset_days: 0.0 }
    }
}

impl Alignment {
    /// Validates policy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::InvalidAlignment`] if a tolerance or offset is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), SeriesError> {
        let (name, width) = match *self {
            Self::Nearest { tolerance_days } => ("tolerance_days", tolerance_days),
            Self::TimeEquivalent { offset_days } => ("offset_days", offset_days),
            Self::Exact | Self::Linear => return Ok(()),
        };
        if !width.is_finite() || width < 0.0 {
            return Err(SeriesError::InvalidAlignment {
                reason: format!("{name} must be finite and non-negative, got {width}"),
            });
        }
        Ok(())
    }

    /// Resolves the regressor value at axis position `t`.
    fn resolve(&self, axis: &[f64], values: &[f64], t: f64) -> Option<f64> {
        match *self {
            Self::Exact => axis
                .binary_search_by(|x| (x + 0.0).total_cmp(&(t + 0.0)))
                .ok()
                .map(|i| values[i]),
            Self::Nearest { tolerance_days } => {
                let idx = axis.partition_point(|&x| x < t);
                let before = idx.checked_sub(1).map(|i| (i, t - axis[i]));
                let after = (idx < axis.len()).then(|| (idx, axis[idx] - t));
                let best = match (before, after) {
                    (Some(b), Some(a)) => Some(if a.1 < b.1 { a } else { b }),
                    (b, a) => b.or(a),
                }?;
                (best.1 <= tolerance_days + AXIS_EPS).then(|| values[best.0])
            }
            Self::TimeEquivalent { offset_days } => {
                let lo = axis.partition_point(|&x| x < t - offset_days - AXIS_EPS);
                let hi = axis.partition_point(|&x| x <= t + offset_days + AXIS_EPS);
                if lo >= hi {
                    return None;
                }
                Some(window_mean(&values[lo..hi]))
            }
            Self::Linear => {
                let idx = axis.partition_point(|&x| x < t);
                if idx < axis.len() && axis[idx] == t {
                    return Some(values[idx]);
                }
                if idx == 0 || idx == axis.len() {
                    return None;
                }
                let (t0, t1) = (axis[idx - 1], axis[idx]);
                let (v0, v1) = (values[idx - 1], values[idx]);
                Some(v0 + (v1 - v0) * (t - t0) / (t1 - t0))
            }
        }
    }
}

fn window_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Observation rows with one resolved value per regressor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedRows {
    /// Observation timestamps of the retained rows.
    pub timestamps: Vec<Timestamp>,
    /// Observation values of the retained rows.
    pub response: Vec<f64>,
    /// `predictors[j][i]` is regressor `j` at row `i`.
    pub predictors: Vec<Vec<f64>>,
}

impl AlignedRows {
    /// Number of aligned rows.
    pub fn len(&self) -> usize {
        self.response.len()
    }

    /// Returns `true` if no row aligned.
    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    /// Regressor values of row `i`, one per regressor.
    pub fn row(&self, i: usize) -> Vec<f64> {
        self.predictors.iter().map(|p| p[i]).collect()
    }
}

/// Aligns `regressors` onto the timestamps of `target`.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidAlignment`] if the policy parameters are
/// invalid.
pub fn align(
    target: &TimeSeries,
    regressors: &[&TimeSeries],
    alignment: Alignment,
    origin: NaiveDateTime,
) -> Result<AlignedRows, SeriesError> {
    alignment.validate()?;

    let axes: Vec<(Vec<f64>, Vec<f64>)> = regressors
        .iter()
        .map(|r| (r.time_axis(origin), r.values()))
        .collect();

    let mut rows = AlignedRows {
        predictors: vec![Vec::new(); regressors.len()],
        ..AlignedRows::default()
    };

    'samples: for sample in target.samples() {
        let t = sample.timestamp.elapsed_days(origin);
        let mut resolved = Vec::with_capacity(axes.len());
        for (axis, values) in &axes {
            match alignment.resolve(axis, values, t) {
                Some(v) => resolved.push(v),
                None => continue 'samples,
            }
        }
        rows.timestamps.push(sample.timestamp);
        rows.response.push(sample.value);
        for (column, v) in rows.predictors.iter_mut().zip(resolved) {
            column.push(v);
        }
    }

    Ok(rows)
}

/// Number of time-equivalent pairs between `target` and `regressor` for each
/// candidate offset, in the order given.
///
/// Useful to pick the smallest offset that yields enough calibration pairs.
///
/// # Errors
///
/// Returns [`SeriesError::InvalidAlignment`] for a negative or non-finite
/// offset.
pub fn count_pairs(
    target: &TimeSeries,
    regressor: &TimeSeries,
    offsets_days: &[f64],
    origin: NaiveDateTime,
) -> Result<Vec<(f64, usize)>, SeriesError> {
    offsets_days
        .iter()
        .map(|&offset_days| {
            let rows = align(
                target,
                &[regressor],
                Alignment::TimeEquivalent { offset_days },
                origin,
            )?;
            Ok((offset_days, rows.len()))
        })
        .collect()
}
