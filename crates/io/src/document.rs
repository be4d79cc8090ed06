//! Serde records mirroring the `.gwref` JSON layout.
//!
//! These types describe the file, not the in-memory model: they carry no
//! invariants beyond what JSON can express. Converting them into a model is
//! the caller's job.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Value of the `format` header field.
pub const FORMAT_NAME: &str = "gwref";
/// Current document version.
pub const FORMAT_VERSION: u32 = 1;
/// File extension used for project files, without the dot.
pub const FILE_EXTENSION: &str = "gwref";

/// Top-level `.gwref` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Always [`FORMAT_NAME`].
    pub format: String,
    /// Always [`FORMAT_VERSION`] when written by this crate.
    pub version: u32,
    /// Project (model) name.
    pub name: String,
    /// Anchor of the elapsed-day axis.
    pub time_origin: NaiveDateTime,
    /// Non-default entries of the model default style.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_style: StyleRecord,
    /// Calibration settings; absent means defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<CalibrationRecord>,
    /// Wells in model insertion order.
    pub wells: Vec<WellRecord>,
}

impl ProjectFile {
    /// Creates a document with the current format header and no wells.
    pub fn new(name: impl Into<String>, time_origin: NaiveDateTime) -> Self {
        Self {
            format: FORMAT_NAME.to_string(),
            version: FORMAT_VERSION,
            name: name.into(),
            time_origin,
            default_style: StyleRecord::new(),
            calibration: None,
            wells: Vec::new(),
        }
    }
}

/// Non-default style entries, keyed by option name.
pub type StyleRecord = BTreeMap<String, StyleValueRecord>;

/// A style value as it appears in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValueRecord {
    /// Numeric option (linewidth, alpha, markersize).
    Number(f64),
    /// Text option (color, linestyle, label, marker).
    Text(String),
}

/// Well role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleRecord {
    /// Observation well.
    Observation,
    /// Reference well.
    Reference,
}

/// Time representation of a well's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeRecord {
    /// ISO-8601 calendar timestamps.
    #[default]
    Calendar,
    /// Numeric day offsets from the time origin.
    Elapsed,
}

/// Sample time: ISO-8601 string or day offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeRecord {
    /// Calendar instant.
    Calendar(NaiveDateTime),
    /// Days since the time origin.
    Elapsed(f64),
}

/// One `[time, value]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord(pub TimeRecord, pub f64);

/// Inclusive calibration window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// First instant included.
    pub start: TimeRecord,
    /// Last instant included.
    pub end: TimeRecord,
}

/// One well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellRecord {
    pub name: String,
    pub role: RoleRecord,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub depth: f64,
    #[serde(default)]
    pub mode: ModeRecord,
    /// Non-default style entries only.
    #[serde(default)]
    pub style: StyleRecord,
    /// Declared regressor well names, in order.
    #[serde(default)]
    pub regressors: Vec<String>,
    #[serde(default)]
    pub calibration_period: Option<PeriodRecord>,
    #[serde(default)]
    pub samples: Vec<SampleRecord>,
}

/// Time alignment policy, tagged by `policy`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum AlignmentRecord {
    Exact,
    Nearest { tolerance_days: f64 },
    TimeEquivalent { offset_days: f64 },
    Linear,
}

/// Model-wide calibration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Regression method name.
    pub method: String,
    pub alignment: AlignmentRecord,
    /// Minimum number of aligned rows.
    pub min_overlap: usize,
    /// Confidence level of the prediction interval.
    pub confidence: f64,
}
