//! Scratch data directories for dashboard tests

use seasonal_forecast::pipeline::FittingPipeline;
use seasonal_forecast::seasons::derive;
use seasonal_forecast::{ArimaxModel, ModelStore, Settings, WeatherTable, YieldTable};
use std::fs;
use tempfile::TempDir;

const MONTHS: [&str; 12] = [
    "JANUARY", "FEBRUARY", "MARCH", "APRIL", "MAY", "JUNE", "JULY", "AUGUST", "SEPTEMBER",
    "OCTOBER", "NOVEMBER", "DECEMBER",
];

const MONTH_BASE: [f64; 12] = [
    29.0, 31.5, 35.0, 37.5, 38.0, 33.0, 29.5, 29.0, 30.5, 31.5, 30.0, 29.0,
];

pub const FIRST_YEAR: i64 = 2000;
pub const LAST_YEAR: i64 = 2012;

fn weather_csv(districts: &[&str]) -> String {
    let mut text = String::from("Dist Name,Year");
    for month in MONTHS {
        text.push_str(&format!(",{} MAXIMUM (Centigrate)", month));
    }
    text.push('\n');

    for (d, district) in districts.iter().enumerate() {
        for year in FIRST_YEAR..=LAST_YEAR {
            let t = (year - FIRST_YEAR) as f64;
            text.push_str(&format!("{},{}", district, year));
            for (m, base) in MONTH_BASE.iter().enumerate() {
                let wobble = 1.5 * (0.7 * t * (m as f64 + 1.0) + d as f64).sin();
                text.push_str(&format!(",{:.3}", base + wobble));
            }
            text.push('\n');
        }
    }
    text
}

/// Yield that follows the seasonal means, so every fitted model is well posed
fn yield_csv(weather: &WeatherTable, districts: &[&str]) -> String {
    let mut text = String::from("Dist Name,Year,Yield\n");
    for district in districts {
        let features = derive(weather, district).unwrap();
        for pos in 0..features.len() {
            let [summer, monsoon, winter] = features.row(pos).map(|v| v.unwrap());
            let year = features.years()[pos].unwrap();
            let t = (year - FIRST_YEAR) as f64;
            let value =
                1.5 + 0.06 * summer - 0.03 * monsoon + 0.02 * winter + 0.01 * (3.0 * t).sin();
            text.push_str(&format!("{},{},{:.4}\n", district, year, value));
        }
    }
    text
}

/// Write weather for `fitted` and `unfitted` districts, and models for `fitted` only
pub fn workspace(fitted: &[&str], unfitted: &[&str]) -> (TempDir, Settings) {
    let dir = TempDir::new().unwrap();
    let settings = Settings::rooted_at(dir.path());

    let all: Vec<&str> = fitted.iter().chain(unfitted).copied().collect();
    fs::write(&settings.data.weather_path, weather_csv(&all)).unwrap();
    let weather = WeatherTable::from_csv(&settings.data.weather_path).unwrap();

    fs::write(&settings.data.yield_path, yield_csv(&weather, fitted)).unwrap();
    let yields = YieldTable::from_csv(&settings.data.yield_path, "Yield").unwrap();

    let store = ModelStore::new(&settings.models.dir);
    let pipeline = FittingPipeline::new(
        &weather,
        &yields,
        &store,
        ArimaxModel::new(),
        settings.forecast.steps,
    );
    for district in fitted {
        pipeline.fit_district(district).unwrap();
    }

    (dir, settings)
}
