use pretty_assertions::assert_eq;
use rstest::rstest;
use seasonal_forecast::error::ForecastError;
use seasonal_forecast::exog::{
    assemble, verify_exogenous_names, ExogenousInput, SeasonalOverrides, SeasonalValues,
};
use seasonal_forecast::models::{FittedModel, ForecastResult};
use seasonal_forecast::seasons::SeasonalFeatureTable;
use std::collections::BTreeSet;

/// Model that declares a fixed set of exogenous names and echoes row sums
#[derive(Debug)]
struct DeclaringModel {
    names: Option<Vec<&'static str>>,
}

impl FittedModel for DeclaringModel {
    fn forecast(
        &self,
        steps: usize,
        exog: &ExogenousInput,
    ) -> seasonal_forecast::Result<ForecastResult> {
        let values = exog.rows().iter().map(|r| r.iter().sum::<f64>()).collect();
        ForecastResult::new(values, steps)
    }

    fn expected_exogenous_names(&self) -> Option<BTreeSet<String>> {
        self.names
            .as_ref()
            .map(|names| names.iter().map(|n| n.to_string()).collect())
    }

    fn name(&self) -> &str {
        "declaring"
    }
}

fn history(rows: usize) -> SeasonalFeatureTable {
    SeasonalFeatureTable::from_rows(
        "A",
        (0..rows)
            .map(|i| {
                let t = i as f64;
                (2000 + i as i64, [Some(30.0 + t), Some(28.0 + t), Some(25.0 + t)])
            })
            .collect(),
    )
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(10)]
fn test_broadcast_repeats_overrides(#[case] steps: usize) {
    let overrides = SeasonalOverrides::from_array([35.5, 29.0, 27.25]);
    let input = assemble(SeasonalValues::Broadcast(overrides), steps).unwrap();

    assert_eq!(input.columns(), &["Summer", "Monsoon", "Winter"]);
    assert_eq!(input.len(), steps);
    assert!(input.rows().iter().all(|r| r == &vec![35.5, 29.0, 27.25]));
}

#[test]
fn test_tail_uses_most_recent_rows() {
    let table = history(8);
    let input = assemble(SeasonalValues::Tail(&table), 5).unwrap();

    assert_eq!(input.len(), 5);
    assert_eq!(input.rows()[0], vec![33.0, 31.0, 28.0]);
    assert_eq!(input.rows()[4], vec![37.0, 35.0, 32.0]);
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(4)]
fn test_tail_with_short_history_fails(#[case] rows: usize) {
    let table = history(rows);
    let err = assemble(SeasonalValues::Tail(&table), 5).unwrap_err();

    match err {
        ForecastError::InsufficientData { needed, available } => {
            assert_eq!(needed, 5);
            assert_eq!(available, rows);
        }
        other => panic!("Expected InsufficientData, got {other:?}"),
    }
}

#[test]
fn test_tail_with_missing_cell_fails() {
    let mut rows: Vec<(i64, [Option<f64>; 3])> = (0..5)
        .map(|i| (2000 + i, [Some(30.0), Some(28.0), Some(25.0)]))
        .collect();
    rows[3].1[1] = None;
    let table = SeasonalFeatureTable::from_rows("A", rows);

    let err = assemble(SeasonalValues::Tail(&table), 5).unwrap_err();
    match err {
        ForecastError::IncompleteExogenous(msg) => {
            assert!(msg.contains("Monsoon"));
            assert!(msg.contains("2003"));
        }
        other => panic!("Expected IncompleteExogenous, got {other:?}"),
    }
}

#[test]
fn test_declared_name_mismatch_is_reported() {
    let model = DeclaringModel {
        names: Some(vec!["Summer", "Monsoon", "X"]),
    };
    let input = assemble(
        SeasonalValues::Broadcast(SeasonalOverrides::from_array([1.0, 2.0, 3.0])),
        5,
    )
    .unwrap();

    let err = verify_exogenous_names(&model, &input).unwrap_err();
    match &err {
        ForecastError::ExogenousShapeMismatch { expected, supplied } => {
            assert_eq!(expected, &vec!["Monsoon", "Summer", "X"]);
            assert_eq!(supplied, &vec!["Monsoon", "Summer", "Winter"]);
        }
        other => panic!("Expected ExogenousShapeMismatch, got {other:?}"),
    }
    assert!(err.to_string().contains("X"));
}

#[test]
fn test_names_are_case_sensitive() {
    let model = DeclaringModel {
        names: Some(vec!["summer", "monsoon", "winter"]),
    };
    let input = assemble(SeasonalValues::Tail(&history(5)), 5).unwrap();
    assert!(verify_exogenous_names(&model, &input).is_err());
}

#[test]
fn test_matching_or_undeclared_names_pass() {
    let input = assemble(SeasonalValues::Tail(&history(5)), 5).unwrap();

    let declaring = DeclaringModel {
        names: Some(vec!["Winter", "Summer", "Monsoon"]),
    };
    assert!(verify_exogenous_names(&declaring, &input).is_ok());

    let silent = DeclaringModel { names: None };
    assert!(verify_exogenous_names(&silent, &input).is_ok());

    let forecast = silent.forecast(5, &input).unwrap();
    assert_eq!(forecast.horizons(), 5);
    assert_eq!(forecast.values()[0], 30.0 + 28.0 + 25.0);
}
