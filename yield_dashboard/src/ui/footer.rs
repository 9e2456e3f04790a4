//! Footer bar widget with keyboard shortcuts.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Focus};

/// Draw the footer bar with context-sensitive help.
pub fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let focus_help = match app.focus {
        Focus::Districts => "[↑↓] District",
        Focus::Sliders => "[↑↓] Season  [←→] Adjust",
    };
    let help_text = format!("{focus_help}  [Tab] Switch panel  [r] Reset  [q] Quit");

    let footer = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(footer, area);
}
