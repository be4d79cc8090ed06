//! On-disk project configuration (`gwref.toml`).
//!
//! ```toml
//! [model]
//! name = "Strandangers"
//! time_origin = "2023-01-01T00:00:00"
//!
//! [calibration]
//! alignment = "time_equivalent"
//! offset_days = 3.5
//! confidence = 0.95
//!
//! [style]
//! color = "gray"
//! linewidth = 1.5
//! ```

use serde::Deserialize;

/// Top-level gwref configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct GwrefConfig {
    /// Model identity and time axis.
    #[serde(default)]
    pub model: ModelToml,

    /// Calibration settings.
    #[serde(default)]
    pub calibration: CalibrationToml,

    /// Default style for new wells.
    #[serde(default)]
    pub style: StyleToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelToml {
    #[serde(default = "default_name")]
    pub name: String,
    /// ISO-8601 date-time, quoted; the Unix epoch when absent.
    #[serde(default)]
    pub time_origin: Option<String>,
}

impl Default for ModelToml {
    fn default() -> Self {
        Self {
            name: default_name(),
            time_origin: None,
        }
    }
}

fn default_name() -> String {
    "gwref".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibrationToml {
    #[serde(default = "default_method")]
    pub method: String,
    /// One of `exact`, `nearest`, `time_equivalent`, `linear`.
    #[serde(default = "default_alignment")]
    pub alignment: String,
    /// Window half-width for `time_equivalent`.
    #[serde(default)]
    pub offset_days: f64,
    /// Search radius for `nearest`.
    #[serde(default)]
    pub tolerance_days: f64,
    #[serde(default = "default_min_overlap")]
    pub min_overlap: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for CalibrationToml {
    fn default() -> Self {
        Self {
            method: default_method(),
            alignment: default_alignment(),
            offset_days: 0.0,
            tolerance_days: 0.0,
            min_overlap: default_min_overlap(),
            confidence: default_confidence(),
        }
    }
}

fn default_method() -> String {
    "linear".to_string()
}
fn default_alignment() -> String {
    "time_equivalent".to_string()
}
fn default_min_overlap() -> usize {
    2
}
fn default_confidence() -> f64 {
    0.95
}

/// Style options; unset fields keep the built-in defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StyleToml {
    pub color: Option<String>,
    pub linestyle: Option<String>,
    pub linewidth: Option<f64>,
    pub label: Option<String>,
    pub alpha: Option<f64>,
    pub marker: Option<String>,
    pub markersize: Option<f64>,
}
