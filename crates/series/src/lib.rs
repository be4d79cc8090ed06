//! # gwref-series
//!
//! Water-level time series and their alignment onto a common time axis.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["(Timestamp, f64) samples"] -->|"TimeSeries::from_samples()"| B["TimeSeries"]
//!     B -->|".as_elapsed(origin)"| C["(days, value) view"]
//!     B -->|".slice() / .range()"| B
//!     B -->|"align(target, regressors, Alignment)"| D["AlignedRows"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use gwref_series::{Alignment, TimeSeries, align};
//!
//! let obs = TimeSeries::elapsed([(0.0, 11.4), (25.0, 11.7)])?;
//! let reference = TimeSeries::elapsed([(1.0, 8.9), (27.0, 9.2)])?;
//! let rows = align(
//!     &obs,
//!     &[&reference],
//!     Alignment::TimeEquivalent { offset_days: 3.5 },
//!     chrono::NaiveDateTime::default(),
//! )?;
//! assert_eq!(rows.len(), 2);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `timestamp` | Calendar and elapsed timestamps, time modes |
//! | `series` | Sorted, duplicate-free sample sequence |
//! | `align` | Alignment policies and pair counting |
//! | `error` | Error types |

mod align;
mod error;
mod series;
mod timestamp;

pub use align::{AlignedRows, Alignment, align, count_pairs};
pub use error::SeriesError;
pub use series::{Elapsed, Sample, TimeSeries};
pub use timestamp::{TimeMode, Timestamp, days_between};
