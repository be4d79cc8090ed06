//! Student-t quantiles and the reference-method prediction interval.

use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::StatsError;

/// Upper-tail Student-t quantile, matching Excel's `T.INV` sign convention.
///
/// Returns `-t.ppf(probability, df)`, so `t_inv(0.025, df)` is the positive
/// critical value of a two-sided 95 % interval.
///
/// # Errors
///
/// Returns [`StatsError::InvalidProbability`] if `probability` is not in
/// (0, 1), or [`StatsError::Distribution`] if `df` is not positive.
pub fn t_inv(probability: f64, df: f64) -> Result<f64, StatsError> {
    if !(probability > 0.0 && probability < 1.0) {
        return Err(StatsError::InvalidProbability { p: probability });
    }
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Distribution {
        reason: e.to_string(),
    })?;
    Ok(-dist.inverse_cdf(probability))
}

/// Half-width of the prediction interval for a calibration of `n` aligned
/// samples with residual standard error `stderr`, at confidence `p`.
///
/// Returns `(pred_const, t_a)` where
/// `t_a = t_inv((1 - p) / 2, n - 1)` and
/// `pred_const = t_a * stderr * sqrt(1 + 1/n)`.
///
/// # Errors
///
/// Returns [`StatsError::InsufficientData`] if `n < 2`, plus any error from
/// [`t_inv`].
pub fn prediction_constant(p: f64, n: usize, stderr: f64) -> Result<(f64, f64), StatsError> {
    if n < 2 {
        return Err(StatsError::InsufficientData { n, required: 2 });
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(StatsError::InvalidProbability { p });
    }
    let nf = n as f64;
    let t_a = t_inv((1.0 - p) / 2.0, nf - 1.0)?;
    let pred_const = t_a * stderr * (1.0 + 1.0 / nf).sqrt();
    Ok((pred_const, t_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn t_inv_two_dof() {
        // Excel: T.INV(0.975, 2) = 4.302653
        assert_relative_eq!(t_inv(0.025, 2.0).unwrap(), 4.302653, epsilon = 1e-4);
    }

    #[test]
    fn t_inv_large_dof_approaches_normal() {
        assert_relative_eq!(t_inv(0.025, 1000.0).unwrap(), 1.962339, epsilon = 1e-3);
    }

    #[test]
    fn t_inv_is_antisymmetric() {
        let lo = t_inv(0.1, 7.0).unwrap();
        let hi = t_inv(0.9, 7.0).unwrap();
        assert_relative_eq!(lo, -hi, epsilon = 1e-6);
    }

    #[test]
    fn t_inv_rejects_bad_probability() {
        assert_eq!(
            t_inv(0.0, 3.0).unwrap_err(),
            StatsError::InvalidProbability { p: 0.0 }
        );
        assert!(matches!(
            t_inv(1.2, 3.0),
            Err(StatsError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn t_inv_rejects_bad_dof() {
        assert!(matches!(
            t_inv(0.025, 0.0),
            Err(StatsError::Distribution { .. })
        ));
    }

    #[test]
    fn prediction_constant_three_samples() {
        // n = 3 -> df = 2, t_a = 4.302653
        let (pc, t_a) = prediction_constant(0.95, 3, 0.1).unwrap();
        assert_relative_eq!(t_a, 4.302653, epsilon = 1e-4);
        assert_relative_eq!(pc, 4.302653 * 0.1 * (4.0f64 / 3.0).sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn prediction_constant_needs_two_samples() {
        assert_eq!(
            prediction_constant(0.95, 1, 0.1).unwrap_err(),
            StatsError::InsufficientData { n: 1, required: 2 }
        );
    }
}
