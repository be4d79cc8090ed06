//! Statistical helper functions for gwref.
//!
//! | Module | Contents |
//! |--------|----------|
//! | (root) | `mean`, `rms`, `pearson_correlation` |
//! | `regression` | [`linear_regression`] and its [`LinearFit`] |
//! | `student_t` | [`t_inv`] and the [`prediction_constant`] of a calibration |

mod error;
mod regression;
mod student_t;

pub use error::StatsError;
pub use regression::{LinearFit, linear_regression};
pub use student_t::{prediction_constant, t_inv};

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Root mean square of a slice. Returns 0.0 if empty.
pub fn rms(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    (data.iter().map(|&x| x * x).sum::<f64>() / data.len() as f64).sqrt()
}

/// Pearson correlation of two equally long samples.
///
/// Returns `None` for mismatched lengths, fewer than three pairs, or when
/// either side is constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 3 {
        return None;
    }
    let (mx, my) = (mean(x), mean(y));
    let (sxy, sxx, syy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (xi, yi)| {
            let (dx, dy) = (xi - mx, yi - my);
            (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
        });
    let denom = (sxx * syy).sqrt();
    (denom > 0.0 && denom.is_finite()).then(|| sxy / denom)
}
