//! Exogenous input tables for forecast calls

use crate::error::{ForecastError, Result};
use crate::models::FittedModel;
use crate::seasons::{Season, SeasonalFeatureTable};
use std::collections::BTreeSet;

/// Default forecast horizon
pub const DEFAULT_STEPS: usize = 5;

/// Row-major table of exogenous regressors
#[derive(Debug, Clone, PartialEq)]
pub struct ExogenousInput {
    /// Column identifiers, in order
    columns: Vec<String>,
    /// One entry per forecast step, each with one value per column
    rows: Vec<Vec<f64>>,
}

impl ExogenousInput {
    /// Create a new table, checking every row matches the column count
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Row has {} values but table has {} columns",
                bad.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Column identifiers, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column identifiers as a set
    pub fn column_set(&self) -> BTreeSet<String> {
        self.columns.iter().cloned().collect()
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Values of one column, if present
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// User-chosen scalar per season
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalOverrides {
    pub summer: f64,
    pub monsoon: f64,
    pub winter: f64,
}

impl SeasonalOverrides {
    /// Value for one season
    pub fn get(&self, season: Season) -> f64 {
        match season {
            Season::Summer => self.summer,
            Season::Monsoon => self.monsoon,
            Season::Winter => self.winter,
        }
    }

    /// Build from values given in `Season::ALL` order
    pub fn from_array(values: [f64; 3]) -> Self {
        let [summer, monsoon, winter] = values;
        Self {
            summer,
            monsoon,
            winter,
        }
    }
}

/// Source of seasonal values for an exogenous table
#[derive(Debug, Clone, Copy)]
pub enum SeasonalValues<'a> {
    /// Most recent historical rows of a feature table
    Tail(&'a SeasonalFeatureTable),
    /// One scalar per season held constant over the horizon
    Broadcast(SeasonalOverrides),
}

/// Assemble the `steps`-row exogenous table a forecast call needs.
///
/// Columns are always `Summer`, `Monsoon`, `Winter`. In tail mode the last
/// `steps` rows are used and any shortfall or missing cell is an error; a
/// short window is never returned.
pub fn assemble(values: SeasonalValues<'_>, steps: usize) -> Result<ExogenousInput> {
    if steps == 0 {
        return Err(ForecastError::InvalidParameter(
            "Forecast steps must be positive".to_string(),
        ));
    }

    let rows = match values {
        SeasonalValues::Broadcast(overrides) => {
            let row: Vec<f64> = Season::ALL.iter().map(|&s| overrides.get(s)).collect();
            vec![row; steps]
        }
        SeasonalValues::Tail(table) => {
            table.require_all_seasons()?;
            if table.len() < steps {
                return Err(ForecastError::InsufficientData {
                    needed: steps,
                    available: table.len(),
                });
            }

            let window = table.tail(steps);
            (0..window.len())
                .map(|i| complete_row(&window, i))
                .collect::<Result<Vec<_>>>()?
        }
    };

    ExogenousInput::new(Season::column_names(), rows)
}

fn complete_row(window: &SeasonalFeatureTable, position: usize) -> Result<Vec<f64>> {
    Season::ALL
        .iter()
        .zip(window.row(position))
        .map(|(season, value)| {
            value.ok_or_else(|| {
                let year = window.years()[position]
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                ForecastError::IncompleteExogenous(format!(
                    "{} value missing for {} in year {}",
                    season,
                    window.district(),
                    year
                ))
            })
        })
        .collect()
}

/// Check the assembled columns against the names a model declares.
///
/// Models that declare nothing are accepted as-is.
pub fn verify_exogenous_names<M: FittedModel + ?Sized>(
    model: &M,
    input: &ExogenousInput,
) -> Result<()> {
    let Some(expected) = model.expected_exogenous_names() else {
        return Ok(());
    };

    let supplied = input.column_set();
    if expected == supplied {
        Ok(())
    } else {
        Err(ForecastError::ExogenousShapeMismatch {
            expected: expected.into_iter().collect(),
            supplied: supplied.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = ExogenousInput::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0], vec![3.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_column_lookup() {
        let input = assemble(
            SeasonalValues::Broadcast(SeasonalOverrides::from_array([30.0, 28.0, 22.0])),
            2,
        )
        .unwrap();
        assert_eq!(input.column("Monsoon"), Some(vec![28.0, 28.0]));
        assert_eq!(input.column("monsoon"), None);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let overrides = SeasonalOverrides::from_array([1.0, 2.0, 3.0]);
        let err = assemble(SeasonalValues::Broadcast(overrides), 0).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }
}
