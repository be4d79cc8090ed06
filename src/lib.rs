//! # gwref
//!
//! Groundwater reference-well analysis: calibrate an observation well's water
//! level against reference wells and flag deviations from the expected level.
//!
//! This crate re-exports the workspace crates and adds the ambient pieces a
//! host application needs: `tracing` setup and TOML project configuration.
//!
//! | Crate | Re-exported as | Contents |
//! |-------|----------------|----------|
//! | `gwref-stats` | [`stats`] | Regression and Student-t helpers |
//! | `gwref-series` | [`series`] | Time series and alignment |
//! | `gwref-io` | [`io`] | `.gwref` document reader/writer |
//! | `gwref-model` | [`model`] | Wells, models, calibration |

pub mod config;
pub mod convert;
pub mod logging;

pub use gwref_io as io;
pub use gwref_model as model;
pub use gwref_series as series;
pub use gwref_stats as stats;

pub use gwref_model::{
    Calibration, CalibrationConfig, CalibrationReport, Deviation, Method, Model, ModelConfig,
    ModelError, Role, Style, Well,
};
pub use gwref_series::{Alignment, TimeMode, TimeSeries, Timestamp};
