//! # Seasonal Forecast
//!
//! Per-district crop-yield forecasting from seasonal temperature features.
//!
//! ## Features
//!
//! - Weather and yield table loading (CSV via polars)
//! - Seasonal feature derivation (Summer, Monsoon, Winter mean maximum temperature)
//! - Exogenous input assembly from history or from user overrides
//! - Regression with AR(1) errors as the per-district forecaster
//! - JSON model artifacts keyed by district
//! - Offline batch fitting and the interactive forecast pipeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use seasonal_forecast::exog::{assemble, SeasonalOverrides, SeasonalValues};
//! use seasonal_forecast::pipeline::prepare_district;
//! use seasonal_forecast::{FittedModel, ModelStore, WeatherTable};
//!
//! let weather = WeatherTable::from_csv("combined_data.csv")?;
//! let store = ModelStore::new("models");
//!
//! let session = prepare_district(&weather, &store, "Pune")?;
//! let overrides = SeasonalOverrides::from_array([36.0, 30.5, 29.0]);
//! let exog = assemble(SeasonalValues::Broadcast(overrides), 5)?;
//! let forecast = session.model().forecast(5, &exog)?;
//! println!("{:?}", forecast.values());
//! # Ok::<(), seasonal_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod exog;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod seasons;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::config::Settings;
pub use crate::data::{DataLoader, WeatherTable, YieldTable};
pub use crate::error::{ForecastError, Result};
pub use crate::exog::{ExogenousInput, SeasonalOverrides, SeasonalValues, DEFAULT_STEPS};
pub use crate::models::{ArimaxModel, FittedArimax, FittedModel, ForecastModel, ForecastResult};
pub use crate::seasons::{Season, SeasonalFeatureTable};
pub use crate::store::ModelStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
