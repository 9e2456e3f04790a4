//! Offline batch: fit and persist one model per district

use crate::data::{WeatherTable, YieldTable};
use crate::error::{ForecastError, Result};
use crate::exog::{assemble, verify_exogenous_names, SeasonalValues};
use crate::models::{FittedModel, ForecastModel};
use crate::seasons::{derive, SeasonalFeatureTable};
use crate::store::ModelStore;
use crate::utils::{forecast_accuracy, holdout_split, ForecastAccuracy};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Seasonal features joined with yield, one row per year, oldest first
#[derive(Debug, Clone)]
pub struct JoinedHistory {
    /// Complete seasonal rows
    pub features: SeasonalFeatureTable,
    /// Yield for each row of `features`
    pub target: Vec<f64>,
}

impl JoinedHistory {
    /// Number of joined rows
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Check if nothing joined
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Inner-join a district's seasonal features with its yield by year.
///
/// Rows missing any season value, the year, or the yield are dropped. When a
/// year repeats in the yield table its first value wins.
pub fn join_history(
    weather: &WeatherTable,
    yields: &YieldTable,
    district: &str,
) -> Result<JoinedHistory> {
    let features = derive(weather, district)?;
    if features.is_empty() {
        return Err(ForecastError::EmptyDistrictData(district.to_string()));
    }
    features.require_all_seasons()?;

    let mut yield_by_year = HashMap::new();
    for record in yields.records_for(district)? {
        yield_by_year.entry(record.year).or_insert(record.value);
    }

    let mut joined: Vec<(usize, i64, f64)> = features
        .years()
        .iter()
        .enumerate()
        .filter_map(|(pos, year)| {
            let year = (*year)?;
            let value = *yield_by_year.get(&year)?;
            let complete = features.row(pos).iter().all(Option::is_some);
            complete.then_some((pos, year, value))
        })
        .collect();
    joined.sort_by_key(|(_, year, _)| *year);

    let positions: Vec<usize> = joined.iter().map(|(pos, _, _)| *pos).collect();
    Ok(JoinedHistory {
        features: features.select(&positions),
        target: joined.iter().map(|(_, _, value)| *value).collect(),
    })
}

/// Result of fitting one district
#[derive(Debug, Clone)]
pub struct DistrictFit {
    /// District name
    pub district: String,
    /// Rows used for fitting
    pub training_rows: usize,
    /// Years of the held-out window
    pub held_out_years: Vec<i64>,
    /// Observed yield over the held-out window
    pub actual: Vec<f64>,
    /// Forecast over the held-out window
    pub forecast: Vec<f64>,
    /// Accuracy of `forecast` against `actual`
    pub accuracy: ForecastAccuracy,
    /// Where the fitted model was written
    pub artifact: PathBuf,
}

/// Outcome for one district of a batch run
#[derive(Debug)]
pub struct DistrictOutcome {
    pub district: String,
    pub result: Result<DistrictFit>,
}

/// Outcomes of a batch run, in district order
#[derive(Debug, Default)]
pub struct FitReport {
    pub outcomes: Vec<DistrictOutcome>,
}

#[derive(Debug, Serialize)]
struct FitReportRow<'a> {
    district: &'a str,
    status: &'static str,
    training_rows: Option<usize>,
    mae: Option<f64>,
    rmse: Option<f64>,
    detail: String,
}

impl FitReport {
    /// Successfully fitted districts
    pub fn fitted(&self) -> impl Iterator<Item = &DistrictFit> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Districts that were skipped, with the cause
    pub fn failed(&self) -> impl Iterator<Item = (&str, &ForecastError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.district.as_str(), e)))
    }

    /// Write a one-row-per-district summary CSV
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for outcome in &self.outcomes {
            let row = match &outcome.result {
                Ok(fit) => FitReportRow {
                    district: &outcome.district,
                    status: "fitted",
                    training_rows: Some(fit.training_rows),
                    mae: Some(fit.accuracy.mae),
                    rmse: Some(fit.accuracy.rmse),
                    detail: fit.artifact.display().to_string(),
                },
                Err(e) => FitReportRow {
                    district: &outcome.district,
                    status: "skipped",
                    training_rows: None,
                    mae: None,
                    rmse: None,
                    detail: e.to_string(),
                },
            };
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Fits one model per district found in the yield table
#[derive(Debug)]
pub struct FittingPipeline<'a, M> {
    weather: &'a WeatherTable,
    yields: &'a YieldTable,
    store: &'a ModelStore,
    model: M,
    steps: usize,
}

impl<'a, M> FittingPipeline<'a, M>
where
    M: ForecastModel,
    M::Fitted: Serialize,
{
    /// Create a new pipeline holding out `steps` rows per district
    pub fn new(
        weather: &'a WeatherTable,
        yields: &'a YieldTable,
        store: &'a ModelStore,
        model: M,
        steps: usize,
    ) -> Self {
        Self {
            weather,
            yields,
            store,
            model,
            steps,
        }
    }

    /// Fit every district; one district failing never stops the others
    pub fn run(&self) -> Result<FitReport> {
        let districts = self.yields.districts()?;
        tracing::info!(count = districts.len(), model = self.model.name(), "fitting districts");

        let mut report = FitReport::default();
        for district in districts {
            let result = self.fit_district(&district);
            if let Err(e) = &result {
                tracing::warn!(district = %district, error = %e, "skipping district");
                // A model left from an earlier run would contradict the report
                match self.store.remove(&district) {
                    Ok(true) => tracing::info!(district = %district, "removed stale model"),
                    Ok(false) => {}
                    Err(err) => tracing::warn!(
                        district = %district,
                        error = %err,
                        "could not remove stale model"
                    ),
                }
            }
            report.outcomes.push(DistrictOutcome { district, result });
        }

        Ok(report)
    }

    /// Fit, evaluate and persist one district; nothing is written unless
    /// the held-out evaluation succeeds
    pub fn fit_district(&self, district: &str) -> Result<DistrictFit> {
        if self.steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "Held-out window must be at least one row".to_string(),
            ));
        }

        let history = join_history(self.weather, self.yields, district)?;
        if history.len() <= self.steps {
            return Err(ForecastError::InsufficientData {
                needed: self.steps + 1,
                available: history.len(),
            });
        }

        let train_rows = history.len() - self.steps;
        let train = history.features.head(train_rows);
        let held_out = history.features.tail(self.steps);
        let (train_target, actual) = holdout_split(&history.target, self.steps);

        let train_exog = assemble(SeasonalValues::Tail(&train), train_rows)?;
        let fitted = self.model.fit(&train_target, &train_exog)?;

        let held_out_exog = assemble(SeasonalValues::Tail(&held_out), self.steps)?;
        verify_exogenous_names(&fitted, &held_out_exog)?;
        let forecast = fitted.forecast(self.steps, &held_out_exog)?;
        let accuracy = forecast_accuracy(forecast.values(), &actual)?;

        let artifact = self.store.save(district, self.model.name(), &fitted)?;

        tracing::info!(
            district,
            training_rows = train_rows,
            forecast = ?forecast.values(),
            actual = ?actual,
            "fitted model; held-out {}",
            accuracy
        );

        Ok(DistrictFit {
            district: district.to_string(),
            training_rows: train_rows,
            held_out_years: held_out.years().iter().flatten().copied().collect(),
            actual,
            forecast: forecast.values().to_vec(),
            accuracy,
            artifact,
        })
    }
}
