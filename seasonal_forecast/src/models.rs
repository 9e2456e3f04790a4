//! Forecasting models with exogenous regressors

use crate::error::{ForecastError, Result};
use crate::exog::ExogenousInput;
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Forecast result containing predicted values, one per horizon
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<f64>,
    /// Number of periods forecasted
    horizons: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<f64>, horizons: usize) -> Result<Self> {
        if values.len() != horizons {
            return Err(ForecastError::ForecastFailure(format!(
                "Values length ({}) doesn't match horizons ({})",
                values.len(),
                horizons
            )));
        }

        Ok(Self { values, horizons })
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizons(&self) -> usize {
        self.horizons
    }
}

/// A fitted model that forecasts from future exogenous values
pub trait FittedModel: Debug {
    /// Forecast `steps` periods given one exogenous row per period
    fn forecast(&self, steps: usize, exog: &ExogenousInput) -> Result<ForecastResult>;

    /// Exogenous column names the model was fit with, when it records them
    fn expected_exogenous_names(&self) -> Option<BTreeSet<String>> {
        None
    }

    /// Name of the model
    fn name(&self) -> &str;
}

/// Estimator that fits a target series against exogenous regressors
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model; `exog` must have one row per target value
    fn fit(&self, target: &[f64], exog: &ExogenousInput) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arimax;

pub use arimax::{ArimaxModel, FittedArimax};
