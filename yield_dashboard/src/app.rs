//! Application state for the dashboard.
//!
//! Every interaction re-runs the forecast pipeline synchronously for the
//! current district and slider values; nothing is cached between runs except
//! the loaded weather table and the session of the selected district.

use seasonal_forecast::pipeline::{
    load_dataset, load_model, open_session, run_forecast, DistrictSession, ForecastView,
    PipelineStage, SliderSpec,
};
use seasonal_forecast::{ForecastError, ModelStore, SeasonalOverrides, Settings, WeatherTable};

/// Which panel receives the arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Districts,
    Sliders,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Districts => Focus::Sliders,
            Focus::Sliders => Focus::Districts,
        }
    }
}

/// What the forecast panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Nothing has been selected yet
    Pending,
    /// Predictions for the current inputs
    Forecast(ForecastView),
    /// The pipeline stopped; shown in place of the forecast
    Failed { stage: PipelineStage, message: String },
}

/// Main application state.
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Panel receiving arrow keys
    pub focus: Focus,
    /// Slider moved by ←/→, index into `Season::ALL`
    pub focused_slider: usize,
    settings: Settings,
    store: ModelStore,
    weather: Option<WeatherTable>,
    districts: Vec<String>,
    selected: usize,
    session: Option<DistrictSession>,
    values: [f64; 3],
    outcome: Outcome,
}

impl App {
    /// Load the dataset and select the first district
    pub fn new(settings: Settings) -> Self {
        let store = ModelStore::new(&settings.models.dir);
        let mut app = Self {
            should_quit: false,
            focus: Focus::default(),
            focused_slider: 0,
            settings,
            store,
            weather: None,
            districts: Vec::new(),
            selected: 0,
            session: None,
            values: [0.0; 3],
            outcome: Outcome::Pending,
        };

        let table = match load_dataset(&app.settings) {
            Ok(table) => table,
            Err(e) => {
                app.fail(&e, None);
                return app;
            }
        };
        match table.districts() {
            Ok(districts) => {
                tracing::info!(districts = districts.len(), "dataset ready");
                app.weather = Some(table);
                app.districts = districts;
                app.select(0);
            }
            Err(e) => app.fail(&e, Some(PipelineStage::DatasetLoaded)),
        }

        app
    }

    /// Show `error` in place of the forecast; `reached` is the last stage passed
    fn fail(&mut self, error: &ForecastError, reached: Option<PipelineStage>) {
        let stage = PipelineStage::aborted_by(error, reached);
        tracing::warn!(stage = stage.label(), error = %error, "pipeline stopped");
        self.outcome = Outcome::Failed {
            stage,
            message: error.to_string(),
        };
    }

    /// Switch to the district at `index`, loading its model and history
    pub fn select(&mut self, index: usize) {
        let Some(weather) = &self.weather else {
            return;
        };
        let Some(district) = self.districts.get(index).cloned() else {
            self.session = None;
            self.outcome = Outcome::Failed {
                stage: PipelineStage::SeasonalDataEmpty,
                message: "The dataset lists no districts".to_string(),
            };
            return;
        };

        self.selected = index;
        let prepared = load_model(&self.store, &district)
            .map_err(|e| (e, PipelineStage::DistrictSelected))
            .and_then(|model| {
                open_session(weather, &district, model)
                    .map_err(|e| (e, PipelineStage::ModelLoaded))
            });
        match prepared {
            Ok(session) => {
                tracing::info!(district = %district, "district selected");
                self.values = session.sliders().map(|s| s.default);
                self.session = Some(session);
                self.recompute();
            }
            Err((e, reached)) => {
                self.session = None;
                self.values = [0.0; 3];
                self.fail(&e, Some(reached));
            }
        }
    }

    /// Run the forecast for the current slider values
    pub fn recompute(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        let overrides = SeasonalOverrides::from_array(self.values);
        match run_forecast(session, overrides, self.settings.forecast.steps) {
            Ok(view) => {
                tracing::debug!(district = %view.district, predictions = ?view.predictions, "forecast updated");
                self.outcome = Outcome::Forecast(view);
            }
            Err(e) => self.fail(&e, Some(PipelineStage::SeasonalDataReady)),
        }
    }

    pub fn next_district(&mut self) {
        if !self.districts.is_empty() {
            self.select((self.selected + 1) % self.districts.len());
        }
    }

    pub fn previous_district(&mut self) {
        if !self.districts.is_empty() {
            let len = self.districts.len();
            self.select((self.selected + len - 1) % len);
        }
    }

    pub fn next_slider(&mut self) {
        self.focused_slider = (self.focused_slider + 1) % 3;
    }

    pub fn previous_slider(&mut self) {
        self.focused_slider = (self.focused_slider + 2) % 3;
    }

    /// Move the focused slider by `direction` steps, staying within its range
    pub fn nudge(&mut self, direction: f64) {
        let Some(session) = &self.session else {
            return;
        };
        let spec = session.sliders()[self.focused_slider];
        let current = self.values[self.focused_slider];
        self.values[self.focused_slider] = spec.clamp(current + direction * spec.step());
        self.recompute();
    }

    /// Put every slider back at its historical mean
    pub fn reset_sliders(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.values = session.sliders().map(|s| s.default);
        self.recompute();
    }

    pub fn districts(&self) -> &[String] {
        &self.districts
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_district(&self) -> Option<&str> {
        self.districts.get(self.selected).map(String::as_str)
    }

    /// Slider specs of the selected district, when its model loaded
    pub fn sliders(&self) -> Option<&[SliderSpec; 3]> {
        self.session.as_ref().map(|s| s.sliders())
    }

    pub fn values(&self) -> [f64; 3] {
        self.values
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn steps(&self) -> usize {
        self.settings.forecast.steps
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
