//! Offline batch fitter: one model per district in the yield table.
//!
//! Reads `seasonal_forecast.toml` when present, otherwise the default paths.

use anyhow::Context;
use seasonal_forecast::pipeline::FittingPipeline;
use seasonal_forecast::{logging, ArimaxModel, ModelStore, Settings, WeatherTable, YieldTable};

fn main() -> anyhow::Result<()> {
    logging::init_stderr("info");

    let settings = Settings::load().context("loading settings")?;
    let weather = WeatherTable::from_csv(&settings.data.weather_path)
        .with_context(|| format!("loading {}", settings.data.weather_path.display()))?;
    let yields = YieldTable::from_csv(&settings.data.yield_path, &settings.data.yield_column)
        .with_context(|| format!("loading {}", settings.data.yield_path.display()))?;
    let store = ModelStore::new(&settings.models.dir);

    let pipeline = FittingPipeline::new(
        &weather,
        &yields,
        &store,
        ArimaxModel::new(),
        settings.forecast.steps,
    );
    let report = pipeline.run()?;

    for fit in report.fitted() {
        println!("{} ({} training rows)", fit.district, fit.training_rows);
        for (year, (forecast, actual)) in fit
            .held_out_years
            .iter()
            .zip(fit.forecast.iter().zip(&fit.actual))
        {
            println!("  {year}: forecast {forecast:.2}, actual {actual:.2}");
        }
        println!("  {}", fit.accuracy);
    }
    for (district, error) in report.failed() {
        println!("{district}: skipped ({error})");
    }

    let report_path = store.dir().join("fit_report.csv");
    std::fs::create_dir_all(store.dir())?;
    report.write_csv(&report_path)?;

    let fitted = report.fitted().count();
    tracing::info!(
        fitted,
        skipped = report.outcomes.len() - fitted,
        report = %report_path.display(),
        "batch complete"
    );
    Ok(())
}
