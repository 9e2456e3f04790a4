//! Header bar widget.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;

/// Draw the header bar with title and data source.
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "District Yield Forecast  |  {}  |  models: {}",
        app.settings().data.weather_path.display(),
        app.settings().models.dir.display()
    );
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}
