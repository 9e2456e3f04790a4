//! Utility functions for the seasonal_forecast crate

use crate::error::{ForecastError, Result};

/// Split a chronological series, holding out the last `holdout` values
pub fn holdout_split<T: Clone>(data: &[T], holdout: usize) -> (Vec<T>, Vec<T>) {
    let train_size = data.len().saturating_sub(holdout);
    (data[..train_size].to_vec(), data[train_size..].to_vec())
}

/// Held-out accuracy of a forecast against the observed values.
///
/// MAPE skips zero actuals in the numerator but still divides by the full
/// window length.
pub fn forecast_accuracy(forecast: &[f64], actual: &[f64]) -> Result<ForecastAccuracy> {
    if forecast.len() != actual.len() || forecast.is_empty() {
        return Err(ForecastError::InvalidParameter(format!(
            "Cannot score {} forecasts against {} observations",
            forecast.len(),
            actual.len()
        )));
    }

    let n = forecast.len() as f64;
    let (abs_sum, sq_sum, pct_sum) = forecast.iter().zip(actual).fold(
        (0.0, 0.0, 0.0),
        |(abs_sum, sq_sum, pct_sum), (&f, &a)| {
            let err = a - f;
            let pct = if a == 0.0 { 0.0 } else { err.abs() / a.abs() };
            (abs_sum + err.abs(), sq_sum + err * err, pct_sum + pct)
        },
    );

    let mse = sq_sum / n;
    Ok(ForecastAccuracy {
        mae: abs_sum / n,
        mse,
        rmse: mse.sqrt(),
        mape: 100.0 * pct_sum / n,
    })
}

/// Error measures over a held-out window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastAccuracy {
    pub mae: f64,
    pub mse: f64,
    pub rmse: f64,
    /// Percent
    pub mape: f64,
}

impl std::fmt::Display for ForecastAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MAE {:.4}, RMSE {:.4}, MAPE {:.2}%",
            self.mae, self.rmse, self.mape
        )
    }
}

/// Solve `a @ x = b` for symmetric positive definite `a` by Cholesky.
///
/// Returns `None` when a pivot is not clearly positive, which is how a
/// singular or collinear design shows up.
pub fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 1e-9 * a[i][i].abs().max(1.0) {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L @ y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' @ x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
