//! Interactive forecast pipeline driven by the dashboard
//!
//! Every user interaction re-runs these functions with the current
//! selection; nothing here keeps state between calls. The model directory
//! is only read, never written.

use crate::config::Settings;
use crate::data::WeatherTable;
use crate::error::{ForecastError, Result};
use crate::exog::{assemble, verify_exogenous_names, SeasonalOverrides, SeasonalValues};
use crate::models::{FittedArimax, FittedModel};
use crate::seasons::{derive, Season, SeasonalFeatureTable};
use crate::store::ModelStore;
use statrs::statistics::Statistics;

/// Stages of the dashboard pipeline, in the order they are reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    DatasetMissing,
    DatasetLoaded,
    DistrictColumnMissing,
    DistrictSelected,
    ModelMissingForDistrict,
    ModelLoaded,
    SeasonalDataEmpty,
    SeasonalDataIncomplete,
    SeasonalDataReady,
    ExogAssembled,
    ForecastMismatch,
    ForecastFailed,
    ForecastSucceeded,
}

impl PipelineStage {
    /// The terminal stage an error leaves the pipeline in.
    ///
    /// `reached` is the last stage passed before the failing step, `None`
    /// while the dataset is still loading. Errors that name their own stage
    /// map to it directly; io, polars and serialization errors map to the
    /// failure stage of the step that raised them.
    pub fn aborted_by(error: &ForecastError, reached: Option<PipelineStage>) -> Self {
        match error {
            ForecastError::MissingDataset(_) => PipelineStage::DatasetMissing,
            ForecastError::MissingColumn { .. } => PipelineStage::DistrictColumnMissing,
            ForecastError::ModelNotFound { .. } | ForecastError::InvalidDistrictName(_) => {
                PipelineStage::ModelMissingForDistrict
            }
            ForecastError::EmptyDistrictData(_) => PipelineStage::SeasonalDataEmpty,
            ForecastError::MissingSeasonColumns(_) => PipelineStage::SeasonalDataIncomplete,
            ForecastError::ExogenousShapeMismatch { .. } => PipelineStage::ForecastMismatch,
            ForecastError::ForecastFailure(_) => PipelineStage::ForecastFailed,
            _ => match reached {
                None | Some(PipelineStage::DatasetMissing) => PipelineStage::DatasetMissing,
                Some(PipelineStage::DatasetLoaded | PipelineStage::DistrictColumnMissing) => {
                    PipelineStage::DistrictColumnMissing
                }
                Some(PipelineStage::DistrictSelected | PipelineStage::ModelMissingForDistrict) => {
                    PipelineStage::ModelMissingForDistrict
                }
                Some(
                    PipelineStage::ModelLoaded
                    | PipelineStage::SeasonalDataEmpty
                    | PipelineStage::SeasonalDataIncomplete,
                ) => PipelineStage::SeasonalDataIncomplete,
                Some(_) => PipelineStage::ForecastFailed,
            },
        }
    }

    /// Short label for status lines
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::DatasetMissing => "dataset missing",
            PipelineStage::DatasetLoaded => "dataset loaded",
            PipelineStage::DistrictColumnMissing => "district column missing",
            PipelineStage::DistrictSelected => "district selected",
            PipelineStage::ModelMissingForDistrict => "model missing",
            PipelineStage::ModelLoaded => "model loaded",
            PipelineStage::SeasonalDataEmpty => "no seasonal data",
            PipelineStage::SeasonalDataIncomplete => "season columns missing",
            PipelineStage::SeasonalDataReady => "seasonal data ready",
            PipelineStage::ExogAssembled => "inputs assembled",
            PipelineStage::ForecastMismatch => "exogenous mismatch",
            PipelineStage::ForecastFailed => "forecast failed",
            PipelineStage::ForecastSucceeded => "forecast ready",
        }
    }
}

/// Slider bounds and default for one season
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub season: Season,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl SliderSpec {
    /// Bounds from the observed history; an empty history gives 0.0 for all three
    pub fn from_history(season: Season, values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                season,
                min: 0.0,
                max: 0.0,
                default: 0.0,
            };
        }

        Self {
            season,
            min: Statistics::min(values),
            max: Statistics::max(values),
            default: Statistics::mean(values),
        }
    }

    /// Keep a value within the slider bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Increment for one keypress
    pub fn step(&self) -> f64 {
        (self.max - self.min) / 50.0
    }

    /// Position of `value` within the range, 0.0 for a degenerate range
    pub fn ratio(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Everything the dashboard needs for one selected district
#[derive(Debug)]
pub struct DistrictSession {
    district: String,
    model: Box<dyn FittedModel>,
    features: SeasonalFeatureTable,
    sliders: [SliderSpec; 3],
}

impl DistrictSession {
    /// Build a session from an already-loaded model and derived features
    pub fn new(
        district: &str,
        model: Box<dyn FittedModel>,
        features: SeasonalFeatureTable,
    ) -> Result<Self> {
        if features.is_empty() {
            return Err(ForecastError::EmptyDistrictData(district.to_string()));
        }
        features.require_all_seasons()?;

        let sliders =
            Season::ALL.map(|s| SliderSpec::from_history(s, &features.valid_values(s)));

        Ok(Self {
            district: district.to_string(),
            model,
            features,
            sliders,
        })
    }

    /// Selected district
    pub fn district(&self) -> &str {
        &self.district
    }

    /// Loaded model
    pub fn model(&self) -> &dyn FittedModel {
        self.model.as_ref()
    }

    /// Historical seasonal features
    pub fn features(&self) -> &SeasonalFeatureTable {
        &self.features
    }

    /// Slider specs in `Season::ALL` order
    pub fn sliders(&self) -> &[SliderSpec; 3] {
        &self.sliders
    }

    /// Slider defaults as overrides
    pub fn default_overrides(&self) -> SeasonalOverrides {
        SeasonalOverrides::from_array(self.sliders.map(|s| s.default))
    }
}

/// Predictions shown for one interaction
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub district: String,
    pub inputs: SeasonalOverrides,
    pub predictions: Vec<f64>,
}

/// Load the weather table named in the settings
pub fn load_dataset(settings: &Settings) -> Result<WeatherTable> {
    let table = WeatherTable::from_csv(&settings.data.weather_path)?;
    tracing::info!(
        path = %settings.data.weather_path.display(),
        rows = table.len(),
        "loaded weather dataset"
    );
    Ok(table)
}

/// Load the persisted model for a district
pub fn load_model(store: &ModelStore, district: &str) -> Result<Box<dyn FittedModel>> {
    let artifact = store.load::<FittedArimax>(district)?;
    tracing::debug!(district, model = %artifact.model_name, fitted_at = %artifact.fitted_at, "loaded model");
    Ok(Box::new(artifact.model))
}

/// Derive the district's features and build its session around `model`
pub fn open_session(
    weather: &WeatherTable,
    district: &str,
    model: Box<dyn FittedModel>,
) -> Result<DistrictSession> {
    let features = derive(weather, district)?;
    DistrictSession::new(district, model, features)
}

/// Load the model and derive features for a newly selected district
pub fn prepare_district(
    weather: &WeatherTable,
    store: &ModelStore,
    district: &str,
) -> Result<DistrictSession> {
    let model = load_model(store, district)?;
    open_session(weather, district, model)
}

/// Forecast `steps` periods holding the overridden seasons constant
pub fn run_forecast(
    session: &DistrictSession,
    overrides: SeasonalOverrides,
    steps: usize,
) -> Result<ForecastView> {
    let exog = assemble(SeasonalValues::Broadcast(overrides), steps)?;
    verify_exogenous_names(session.model(), &exog)?;

    let forecast = session
        .model()
        .forecast(steps, &exog)
        .map_err(|e| match e {
            ForecastError::ExogenousShapeMismatch { .. } | ForecastError::ForecastFailure(_) => e,
            other => ForecastError::ForecastFailure(other.to_string()),
        })?;

    Ok(ForecastView {
        district: session.district.clone(),
        inputs: overrides,
        predictions: forecast.values().to_vec(),
    })
}
