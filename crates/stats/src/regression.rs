//! Multiple ordinary least-squares regression.

use crate::error::StatsError;

/// Relative pivot size below which the normal equations are treated as
/// singular.
const SINGULAR_TOL: f64 = 1e-12;

/// Result of an ordinary least-squares fit `y = b0 + b1*x1 + ... + bk*xk`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    intercept: f64,
    coefficients: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    ssr: f64,
    r_squared: f64,
}

impl LinearFit {
    /// Intercept `b0`.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Slope coefficients, one per predictor, in predictor order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted values for each observation.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// Residuals `y - fitted`.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Number of observations used.
    pub fn n(&self) -> usize {
        self.fitted.len()
    }

    /// Number of predictors.
    pub fn k(&self) -> usize {
        self.coefficients.len()
    }

    /// Sum of squared residuals.
    pub fn ssr(&self) -> f64 {
        self.ssr
    }

    /// Coefficient of determination.
    ///
    /// A constant response is reproduced exactly by the intercept, so its
    /// R² is reported as 1.0.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Root mean squared error of the residuals (N denominator).
    pub fn rmse(&self) -> f64 {
        crate::rms(&self.residuals)
    }

    /// Residual standard error `sqrt(SSR / (n - k - 1))`.
    ///
    /// Returns `None` when there are no residual degrees of freedom.
    pub fn residual_std_error(&self) -> Option<f64> {
        let dof = self.n().checked_sub(self.k() + 1)?;
        if dof == 0 {
            return None;
        }
        Some((self.ssr / dof as f64).sqrt())
    }

    /// Evaluates the fitted relation for one set of predictor values.
    ///
    /// Returns `None` if `x` does not have one value per predictor.
    pub fn predict(&self, x: &[f64]) -> Option<f64> {
        if x.len() != self.coefficients.len() {
            return None;
        }
        Some(
            self.intercept
                + self
                    .coefficients
                    .iter()
                    .zip(x)
                    .map(|(b, xi)| b * xi)
                    .sum::<f64>(),
        )
    }
}

/// Fits `response` on `predictors` by ordinary least squares.
///
/// `predictors[j][i]` is the value of predictor `j` at observation `i`. The
/// system is solved on mean-centred data via the normal equations with
/// partial pivoting, which is well conditioned for the handful of reference
/// wells a calibration uses.
///
/// # Errors
///
/// - [`StatsError::NoPredictors`] if `predictors` is empty.
/// - [`StatsError::LengthMismatch`] if a predictor length differs from the
///   response length.
/// - [`StatsError::InsufficientData`] if there are fewer than `k + 1`
///   observations.
/// - [`StatsError::NonFinite`] if any input is NaN or infinite.
/// - [`StatsError::Singular`] if a predictor is constant or the predictors
///   are collinear.
pub fn linear_regression<P: AsRef<[f64]>>(
    predictors: &[P],
    response: &[f64],
) -> Result<LinearFit, StatsError> {
    let k = predictors.len();
    if k == 0 {
        return Err(StatsError::NoPredictors);
    }
    let n = response.len();
    for (index, p) in predictors.iter().enumerate() {
        let got = p.as_ref().len();
        if got != n {
            return Err(StatsError::LengthMismatch {
                index,
                expected: n,
                got,
            });
        }
    }
    if n < k + 1 {
        return Err(StatsError::InsufficientData { n, required: k + 1 });
    }
    for row in 0..n {
        let finite = response[row].is_finite()
            && predictors.iter().all(|p| p.as_ref()[row].is_finite());
        if !finite {
            return Err(StatsError::NonFinite { row });
        }
    }

    let y_mean = crate::mean(response);
    let x_means: Vec<f64> = predictors.iter().map(|p| crate::mean(p.as_ref())).collect();

    // Centred normal equations: S * beta = b
    let mut s = vec![vec![0.0; k]; k];
    let mut b = vec![0.0; k];
    for row in 0..n {
        let dy = response[row] - y_mean;
        for i in 0..k {
            let di = predictors[i].as_ref()[row] - x_means[i];
            b[i] += di * dy;
            for j in i..k {
                s[i][j] += di * (predictors[j].as_ref()[row] - x_means[j]);
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            s[i][j] = s[j][i];
        }
    }

    let coefficients = solve(s, b)?;
    let intercept = y_mean
        - coefficients
            .iter()
            .zip(&x_means)
            .map(|(beta, m)| beta * m)
            .sum::<f64>();

    let fitted: Vec<f64> = (0..n)
        .map(|row| {
            intercept
                + coefficients
                    .iter()
                    .enumerate()
                    .map(|(j, beta)| beta * predictors[j].as_ref()[row])
                    .sum::<f64>()
        })
        .collect();
    let residuals: Vec<f64> = response.iter().zip(&fitted).map(|(y, f)| y - f).collect();

    let ssr: f64 = residuals.iter().map(|r| r * r).sum();
    let sst: f64 = response.iter().map(|y| (y - y_mean) * (y - y_mean)).sum();
    let r_squared = if sst > 0.0 { 1.0 - ssr / sst } else { 1.0 };

    Ok(LinearFit {
        intercept,
        coefficients,
        fitted,
        residuals,
        ssr,
        r_squared,
    })
}

/// Gaussian elimination with partial pivoting on a small dense system.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, StatsError> {
    let k = b.len();
    let scale = (0..k).map(|i| a[i][i].abs()).fold(0.0, f64::max);
    if scale == 0.0 {
        return Err(StatsError::Singular {
            reason: "all predictors are constant".to_string(),
        });
    }

    for col in 0..k {
        let pivot_row = (col..k)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() <= SINGULAR_TOL * scale {
            return Err(StatsError::Singular {
                reason: format!("predictor {col} is constant or collinear with others"),
            });
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..k {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..k {
                a[row][c] -= factor * a[col][c];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; k];
    for row in (0..k).rev() {
        let tail: f64 = ((row + 1)..k).map(|c| a[row][c] * x[c]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}
