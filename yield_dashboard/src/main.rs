//! yield-dashboard - what-if crop-yield forecasts per district in the terminal.

mod app;
mod event;
#[cfg(test)]
mod fixtures;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use seasonal_forecast::{logging, Settings};

use app::App;
use event::{handle_key_event, poll_event};
use ui::draw_ui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load settings")?;

    // The alternate screen owns the terminal, so logs go to a file
    let log_path = settings.dashboard.log_path.clone();
    logging::init_file(&log_path, "info")
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;
    tracing::info!(weather = %settings.data.weather_path.display(), "starting dashboard");

    let mut app = App::new(settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "dashboard stopped");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    let tick_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        if let Some(Event::Key(key)) = poll_event(tick_rate)? {
            handle_key_event(app, key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
