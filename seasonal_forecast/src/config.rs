//! Settings shared by the fitter and the dashboard
//!
//! Values come from in-code defaults, optionally overridden by a TOML file
//! (`seasonal_forecast.toml` in the working directory unless another path is
//! given).

use crate::error::Result;
use crate::exog::DEFAULT_STEPS;
use config::File;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default settings file, looked up relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "seasonal_forecast.toml";

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Input table locations
    pub data: DataSettings,
    /// Model artifact location
    pub models: ModelSettings,
    /// Forecast parameters
    pub forecast: ForecastSettings,
    /// Dashboard-only options
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    /// Weather CSV with monthly maximum temperatures
    pub weather_path: PathBuf,
    /// Yield CSV used by the offline fitter
    pub yield_path: PathBuf,
    /// Name of the yield measurement column
    pub yield_column: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelSettings {
    /// Directory holding `{district}_model.json` artifacts
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSettings {
    /// Forecast horizon and held-out window length
    pub steps: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardSettings {
    /// Log file, outside the model directory
    pub log_path: PathBuf,
}

impl Settings {
    /// Load settings from the default file, if present
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from `path`; a missing file leaves the defaults in place
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("data.weather_path", "combined_data.csv")?
            .set_default("data.yield_path", "yield_data.csv")?
            .set_default("data.yield_column", "Yield")?
            .set_default("models.dir", "models")?
            .set_default("forecast.steps", DEFAULT_STEPS as i64)?
            .set_default("dashboard.log_path", "yield_dashboard.log")?
            .add_source(File::from(path.as_ref()).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Settings pointing every path into `root`, used for scratch directories
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            data: DataSettings {
                weather_path: root.join("combined_data.csv"),
                yield_path: root.join("yield_data.csv"),
                yield_column: "Yield".to_string(),
            },
            models: ModelSettings {
                dir: root.join("models"),
            },
            forecast: ForecastSettings {
                steps: DEFAULT_STEPS,
            },
            dashboard: DashboardSettings {
                log_path: root.join("yield_dashboard.log"),
            },
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::rooted_at("")
    }
}
