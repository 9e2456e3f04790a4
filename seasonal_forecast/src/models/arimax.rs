//! Regression with AR(1) errors, the ARIMAX(1,0,0) model used per district
//!
//! The target is regressed on the exogenous columns by ordinary least
//! squares; the residuals are then treated as an AR(1) process whose
//! influence decays over the forecast horizon:
//!
//! ```text
//! y(t)     = b0 + b . x(t) + e(t),   e(t) = phi * e(t-1) + u(t)
//! y(T + h) = b0 + b . x(T + h) + phi^h * e(T)
//! ```

use crate::error::{ForecastError, Result};
use crate::exog::ExogenousInput;
use crate::models::{FittedModel, ForecastModel, ForecastResult};
use crate::utils::solve_symmetric;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Largest magnitude allowed for the AR coefficient
const MAX_PHI: f64 = 0.99;

/// Ridge term added to the normal equations
const RIDGE: f64 = 1e-8;

/// Regression-with-AR(1)-errors estimator
#[derive(Debug, Clone)]
pub struct ArimaxModel {
    /// Name of the model
    name: String,
    /// Whether residual autocorrelation is modelled
    ar_errors: bool,
}

/// Fitted regression-with-AR(1)-errors model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedArimax {
    /// Name of the model
    name: String,
    /// Exogenous column names in coefficient order
    exog_names: Vec<String>,
    /// Regression intercept
    intercept: f64,
    /// One coefficient per exogenous column
    coefficients: Vec<f64>,
    /// AR(1) coefficient of the residuals
    phi: f64,
    /// Residual of the last training observation
    last_residual: f64,
    /// Innovation variance
    sigma2: f64,
    /// Number of training observations
    nobs: usize,
}

impl Default for ArimaxModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ArimaxModel {
    /// Create a new model with AR(1) errors
    pub fn new() -> Self {
        Self {
            name: "ARIMAX(1,0,0)".to_string(),
            ar_errors: true,
        }
    }

    /// Plain regression on the exogenous columns, no error dynamics
    pub fn regression_only() -> Self {
        Self {
            name: "ARIMAX(0,0,0)".to_string(),
            ar_errors: false,
        }
    }

    /// Minimum observations needed for `k` regressors
    pub fn min_observations(&self, k: usize) -> usize {
        k + 1 + usize::from(self.ar_errors) + 1
    }
}

impl ForecastModel for ArimaxModel {
    type Fitted = FittedArimax;

    fn fit(&self, target: &[f64], exog: &ExogenousInput) -> Result<FittedArimax> {
        let n = target.len();
        let k = exog.columns().len();

        if exog.len() != n {
            return Err(ForecastError::FittingFailure(format!(
                "Target has {} observations but exogenous table has {} rows",
                n,
                exog.len()
            )));
        }

        let needed = self.min_observations(k);
        if n < needed {
            return Err(ForecastError::FittingFailure(format!(
                "{} needs at least {} observations, got {}",
                self.name, needed, n
            )));
        }

        let all_finite = target.iter().all(|v| v.is_finite())
            && exog.rows().iter().flatten().all(|v| v.is_finite());
        if !all_finite {
            return Err(ForecastError::FittingFailure(
                "Training data contains non-finite values".to_string(),
            ));
        }

        // Normal equations for y = b0 + b . x
        let num_params = k + 1;
        let mut xtx = vec![vec![0.0; num_params]; num_params];
        let mut xty = vec![0.0; num_params];

        for (row, &y) in exog.rows().iter().zip(target) {
            let design: Vec<f64> = std::iter::once(1.0).chain(row.iter().copied()).collect();
            for i in 0..num_params {
                xty[i] += design[i] * y;
                for j in 0..num_params {
                    xtx[i][j] += design[i] * design[j];
                }
            }
        }

        for (i, row) in xtx.iter_mut().enumerate() {
            row[i] += RIDGE;
        }

        let beta = solve_symmetric(&xtx, &xty).ok_or_else(|| {
            ForecastError::FittingFailure(
                "Design matrix is singular; exogenous columns are collinear or constant"
                    .to_string(),
            )
        })?;

        let intercept = beta[0];
        let coefficients = beta[1..].to_vec();

        let residuals: Vec<f64> = exog
            .rows()
            .iter()
            .zip(target)
            .map(|(row, &y)| y - linear_predictor(intercept, &coefficients, row))
            .collect();

        let phi = if self.ar_errors {
            lag_one_coefficient(&residuals)
        } else {
            0.0
        };

        let innovations: Vec<f64> = residuals.windows(2).map(|w| w[1] - phi * w[0]).collect();
        let sigma2 = if innovations.is_empty() {
            0.0
        } else {
            innovations.iter().map(|u| u * u).sum::<f64>() / innovations.len() as f64
        };

        let last_residual = residuals.last().copied().unwrap_or(0.0);

        if !(intercept.is_finite() && coefficients.iter().all(|c| c.is_finite())) {
            return Err(ForecastError::FittingFailure(
                "Estimated coefficients are not finite".to_string(),
            ));
        }

        Ok(FittedArimax {
            name: self.name.clone(),
            exog_names: exog.columns().to_vec(),
            intercept,
            coefficients,
            phi,
            last_residual,
            sigma2,
            nobs: n,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Yule-Walker estimate of the lag-1 coefficient, clamped to a stationary range
fn lag_one_coefficient(residuals: &[f64]) -> f64 {
    let denom: f64 = residuals.iter().map(|e| e * e).sum();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    let numer: f64 = residuals.windows(2).map(|w| w[0] * w[1]).sum();
    (numer / denom).clamp(-MAX_PHI, MAX_PHI)
}

fn linear_predictor(intercept: f64, coefficients: &[f64], row: &[f64]) -> f64 {
    intercept
        + coefficients
            .iter()
            .zip(row)
            .map(|(b, x)| b * x)
            .sum::<f64>()
}

impl FittedArimax {
    /// Regression intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Regression coefficients in `exog_names` order
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Exogenous column names in coefficient order
    pub fn exog_names(&self) -> &[String] {
        &self.exog_names
    }

    /// AR(1) coefficient of the residuals
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Number of training observations
    pub fn nobs(&self) -> usize {
        self.nobs
    }
}

impl FittedModel for FittedArimax {
    fn forecast(&self, steps: usize, exog: &ExogenousInput) -> Result<ForecastResult> {
        let expected: BTreeSet<String> = self.exog_names.iter().cloned().collect();
        if expected != exog.column_set() {
            return Err(ForecastError::ExogenousShapeMismatch {
                expected: expected.into_iter().collect(),
                supplied: exog.column_set().into_iter().collect(),
            });
        }

        if exog.len() != steps {
            return Err(ForecastError::ForecastFailure(format!(
                "Exogenous table has {} rows but {} steps were requested",
                exog.len(),
                steps
            )));
        }

        // Reorder supplied columns to coefficient order
        let columns: Vec<Vec<f64>> = self
            .exog_names
            .iter()
            .filter_map(|name| exog.column(name))
            .collect();

        let mut ar_term = self.last_residual;
        let mut values = Vec::with_capacity(steps);
        for step in 0..steps {
            ar_term *= self.phi;
            let row: Vec<f64> = columns.iter().map(|c| c[step]).collect();
            let value = linear_predictor(self.intercept, &self.coefficients, &row) + ar_term;
            if !value.is_finite() {
                return Err(ForecastError::ForecastFailure(format!(
                    "Non-finite prediction at step {}",
                    step + 1
                )));
            }
            values.push(value);
        }

        ForecastResult::new(values, steps)
    }

    fn expected_exogenous_names(&self) -> Option<BTreeSet<String>> {
        Some(self.exog_names.iter().cloned().collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
