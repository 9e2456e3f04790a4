//! # Crop Yield Workspace
//!
//! Umbrella crate for the district crop-yield forecasting workspace.
//!
//! - [`seasonal_forecast`] holds the data handling, feature derivation,
//!   forecaster, model store and both pipelines, plus the `fit_models`
//!   batch binary.
//! - `yield_dashboard` is the terminal dashboard binary built on top of it.
//!
//! ## Example
//!
//! ```
//! use crop_yield_workspace::seasonal_forecast::exog::{assemble, SeasonalOverrides, SeasonalValues};
//!
//! let overrides = SeasonalOverrides::from_array([36.0, 30.5, 29.0]);
//! let exog = assemble(SeasonalValues::Broadcast(overrides), 5).unwrap();
//! assert_eq!(exog.len(), 5);
//! assert_eq!(exog.columns(), &["Summer", "Monsoon", "Winter"]);
//! ```

pub use seasonal_forecast;

pub use seasonal_forecast::{
    ArimaxModel, FittedArimax, FittedModel, ForecastError, ForecastModel, ModelStore, Season,
    Settings, WeatherTable, YieldTable,
};
