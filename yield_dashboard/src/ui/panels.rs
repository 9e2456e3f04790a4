//! District selector, season sliders and forecast panels.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};
use seasonal_forecast::Season;

use crate::app::{App, Focus, Outcome};

fn panel_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {title} "))
}

pub fn draw_district_list(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .districts()
        .iter()
        .map(|d| ListItem::new(d.as_str()))
        .collect();

    let list = List::new(items)
        .block(panel_block("Districts", app.focus == Focus::Districts))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.districts().is_empty() {
        state.select(Some(app.selected()));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// One gauge per season, labelled with value and historical range
pub fn draw_sliders(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel_block("Seasonal max temperature (°C)", app.focus == Focus::Sliders);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(sliders) = app.sliders() else {
        let idle = Paragraph::new("No model loaded for this district")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(idle, inner);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 3])
        .split(inner);

    let values = app.values();
    for (i, (spec, season)) in sliders.iter().zip(Season::ALL).enumerate() {
        let focused = app.focus == Focus::Sliders && app.focused_slider == i;
        let color = if focused { Color::Yellow } else { Color::Green };
        let label = format!(
            "{:<8} {:>6.2}   [{:.2} .. {:.2}]",
            season.name(),
            values[i],
            spec.min,
            spec.max
        );

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(spec.ratio(values[i]))
            .label(label);
        frame.render_widget(gauge, rows[i]);
    }
}

/// The forecast table, or the pipeline error in red
pub fn draw_forecast(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!("Forecast ({} years)", app.steps());
    match app.outcome() {
        Outcome::Pending => {
            let placeholder = Paragraph::new("Select a district")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(panel_block(&title, false));
            frame.render_widget(placeholder, area);
        }
        Outcome::Failed { stage, message } => {
            let text = vec![
                Line::from(stage.label().to_string()).style(
                    Style::default()
                        .fg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(message.as_str()),
            ];
            let error = Paragraph::new(text)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(panel_block(&title, false));
            frame.render_widget(error, area);
        }
        Outcome::Forecast(view) => {
            let rows: Vec<Row> = view
                .predictions
                .iter()
                .enumerate()
                .map(|(i, value)| {
                    Row::new(vec![format!("Year +{}", i + 1), format!("{:.3}", value)])
                })
                .collect();

            let table = Table::new(rows, [Constraint::Length(12), Constraint::Length(14)])
                .header(
                    Row::new(vec!["Horizon", "Yield"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .block(panel_block(&format!("{} - {}", title, view.district), false));
            frame.render_widget(table, area);
        }
    }
}
