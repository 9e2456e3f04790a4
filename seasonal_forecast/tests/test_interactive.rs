mod common;

use common::{synthetic_weather, synthetic_yield, weather_csv, write, yield_csv, MonthValues};
use pretty_assertions::assert_eq;
use seasonal_forecast::error::ForecastError;
use seasonal_forecast::exog::{assemble, SeasonalOverrides, SeasonalValues};
use seasonal_forecast::models::FittedModel;
use seasonal_forecast::pipeline::{
    load_dataset, prepare_district, run_forecast, FittingPipeline, PipelineStage,
};
use seasonal_forecast::{ArimaxModel, ModelStore, Season, Settings, WeatherTable, YieldTable};
use tempfile::TempDir;

/// Write the tables, fit district A and return the scratch settings
fn fitted_workspace(weather: &[(&'static str, i64, MonthValues)]) -> (TempDir, Settings) {
    let dir = TempDir::new().unwrap();
    let settings = Settings::rooted_at(dir.path());

    write(&settings.data.weather_path, &weather_csv(weather));
    write(
        &settings.data.yield_path,
        &yield_csv(&synthetic_yield(weather, 21)),
    );

    let weather = WeatherTable::from_csv(&settings.data.weather_path).unwrap();
    let yields = YieldTable::from_csv(&settings.data.yield_path, "Yield").unwrap();
    let store = ModelStore::new(&settings.models.dir);
    FittingPipeline::new(&weather, &yields, &store, ArimaxModel::new(), 5)
        .fit_district("A")
        .unwrap();

    (dir, settings)
}

#[test]
fn test_missing_dataset_is_reported() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::rooted_at(dir.path());

    let err = load_dataset(&settings).unwrap_err();
    assert!(matches!(err, ForecastError::MissingDataset(_)));
    assert_eq!(
        PipelineStage::aborted_by(&err, None),
        PipelineStage::DatasetMissing
    );
}

#[test]
fn test_missing_district_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::rooted_at(dir.path());
    write(&settings.data.weather_path, "District,Year\nA,2000\n");

    let err = load_dataset(&settings).unwrap_err();
    match &err {
        ForecastError::MissingColumn { column, .. } => assert_eq!(column, "Dist Name"),
        other => panic!("Expected MissingColumn, got {other:?}"),
    }
    assert_eq!(
        PipelineStage::aborted_by(&err, None),
        PipelineStage::DistrictColumnMissing
    );
}

#[test]
fn test_district_without_model() {
    let mut weather = synthetic_weather("A", 2000..=2012, 1);
    weather.extend(synthetic_weather("B", 2000..=2012, 2));
    let (_dir, settings) = fitted_workspace(&weather);

    let table = load_dataset(&settings).unwrap();
    assert_eq!(table.districts().unwrap(), vec!["A", "B"]);

    let store = ModelStore::new(&settings.models.dir);
    let err = prepare_district(&table, &store, "B").unwrap_err();
    assert!(matches!(err, ForecastError::ModelNotFound { .. }));
    assert_eq!(
        PipelineStage::aborted_by(&err, Some(PipelineStage::DistrictSelected)),
        PipelineStage::ModelMissingForDistrict
    );
}

#[test]
fn test_district_with_model_but_no_rows() {
    let (_dir, settings) = fitted_workspace(&synthetic_weather("A", 2000..=2012, 1));

    // Swap in a weather file that no longer mentions A
    write(
        &settings.data.weather_path,
        &weather_csv(&synthetic_weather("B", 2000..=2002, 3)),
    );
    let table = load_dataset(&settings).unwrap();
    let store = ModelStore::new(&settings.models.dir);

    let err = prepare_district(&table, &store, "A").unwrap_err();
    assert!(matches!(err, ForecastError::EmptyDistrictData(ref d) if d == "A"));
    assert_eq!(
        PipelineStage::aborted_by(&err, Some(PipelineStage::ModelLoaded)),
        PipelineStage::SeasonalDataEmpty
    );
}

#[test]
fn test_sliders_follow_history() {
    let weather = synthetic_weather("A", 2000..=2012, 1);
    let (_dir, settings) = fitted_workspace(&weather);
    let table = load_dataset(&settings).unwrap();
    let store = ModelStore::new(&settings.models.dir);

    let session = prepare_district(&table, &store, "A").unwrap();
    let summer = session.features().valid_values(Season::Summer);
    let slider = session.sliders()[0];

    assert_eq!(slider.season, Season::Summer);
    assert_eq!(slider.min, summer.iter().cloned().fold(f64::INFINITY, f64::min));
    assert_eq!(slider.max, summer.iter().cloned().fold(f64::NEG_INFINITY, f64::max));
    approx::assert_relative_eq!(
        slider.default,
        summer.iter().sum::<f64>() / summer.len() as f64,
        epsilon = 1e-9
    );
}

#[test]
fn test_season_with_no_values_gets_zero_slider() {
    let (_dir, settings) = fitted_workspace(&synthetic_weather("A", 2000..=2012, 1));

    // Rewrite A's weather with every winter month blank
    let mut sparse = synthetic_weather("A", 2000..=2003, 4);
    for (_, _, values) in sparse.iter_mut() {
        for month in [9, 10, 11, 0, 1] {
            values[month] = None;
        }
    }
    write(&settings.data.weather_path, &weather_csv(&sparse));

    let table = load_dataset(&settings).unwrap();
    let store = ModelStore::new(&settings.models.dir);
    let session = prepare_district(&table, &store, "A").unwrap();

    let winter = session.sliders()[2];
    assert_eq!(winter.season, Season::Winter);
    assert_eq!((winter.min, winter.max, winter.default), (0.0, 0.0, 0.0));
    assert_eq!(session.default_overrides().winter, 0.0);

    let view = run_forecast(&session, session.default_overrides(), 5).unwrap();
    assert_eq!(view.predictions.len(), 5);
}

#[test]
fn test_forecast_matches_model_on_broadcast_inputs() {
    let (_dir, settings) = fitted_workspace(&synthetic_weather("A", 2000..=2012, 1));
    let table = load_dataset(&settings).unwrap();
    let store = ModelStore::new(&settings.models.dir);
    let session = prepare_district(&table, &store, "A").unwrap();

    let overrides = SeasonalOverrides::from_array([36.0, 30.5, 29.5]);
    let view = run_forecast(&session, overrides, 5).unwrap();

    let exog = assemble(SeasonalValues::Broadcast(overrides), 5).unwrap();
    let expected = session.model().forecast(5, &exog).unwrap();

    assert_eq!(view.district, "A");
    assert_eq!(view.inputs, overrides);
    assert_eq!(view.predictions, expected.values().to_vec());
    assert!(view.predictions.iter().all(|p| p.is_finite()));
}

#[test]
fn test_repeated_forecasts_are_stable() {
    let (_dir, settings) = fitted_workspace(&synthetic_weather("A", 2000..=2012, 1));
    let table = load_dataset(&settings).unwrap();
    let store = ModelStore::new(&settings.models.dir);
    let session = prepare_district(&table, &store, "A").unwrap();

    let first = run_forecast(&session, session.default_overrides(), 5).unwrap();
    let second = run_forecast(&session, session.default_overrides(), 5).unwrap();
    assert_eq!(first, second);

    // Only the residual term differs between horizons
    let diffs: Vec<f64> = first.predictions.windows(2).map(|w| w[1] - w[0]).collect();
    assert!(diffs.iter().all(|d| d.abs() < 1.0));
}
