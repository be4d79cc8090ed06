//! # gwref-model
//!
//! Wells, models and the reference-well calibration method.
//!
//! An observation well's water level is regressed on one or more reference
//! wells. The calibrated relation predicts the level the observation well
//! would have without local influence; samples outside the prediction
//! interval are deviations.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gwref_model::{Model, Role};
//!
//! let mut model = Model::new("Strandangers");
//! model.create_well("obs", Role::Observation)?;
//! model.create_well("ref", Role::Reference)?;
//! model.extend_series("obs", obs_samples)?;
//! model.extend_series("ref", ref_samples)?;
//! model.calibrate("obs", &["ref"])?;
//! let flagged = model.deviations("obs")?.into_iter().filter(|d| d.outside);
//! model.save(Path::new("strandangers.gwref"))?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `model` | Well collection, invariants, calibration orchestration |
//! | `well` | Well data and single-well calibration |
//! | `calibration` | Calibration outputs, reports, deviations |
//! | `style` | Fixed set of display options |
//! | `config` | Model and calibration settings |
//! | `persist` | Model <-> `.gwref` document conversion |
//! | `error` | Error types |

mod calibration;
mod config;
mod error;
mod model;
mod persist;
mod style;
mod well;

pub use calibration::{Calibration, CalibrationReport, Deviation, Method};
pub use config::{CalibrationConfig, ModelConfig};
pub use error::ModelError;
pub use model::Model;
pub use style::{Style, StyleError, StyleOption, StyleValue};
pub use well::{PlotView, Role, Well};
