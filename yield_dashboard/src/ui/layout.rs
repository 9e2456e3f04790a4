//! Main layout for the dashboard.

use ratatui::prelude::*;

use super::footer::draw_footer;
use super::header::draw_header;
use super::panels::{draw_district_list, draw_forecast, draw_sliders};
use crate::app::App;

/// Draw the main UI layout.
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(12),   // Content
            Constraint::Length(2), // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(40)])
        .split(chunks[1]);

    draw_district_list(frame, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Three gauges
            Constraint::Min(5),    // Forecast
        ])
        .split(columns[1]);

    draw_sliders(frame, right[0], app);
    draw_forecast(frame, right[1], app);

    draw_footer(frame, chunks[2], app);
}
