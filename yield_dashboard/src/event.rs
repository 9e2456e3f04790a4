//! Event handling for the dashboard.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::{App, Focus};

/// Handle keyboard events.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Windows reports both press and release
    if key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab => app.focus = app.focus.toggle(),
        KeyCode::Char('r') => app.reset_sliders(),
        KeyCode::Left | KeyCode::Char('h') => app.nudge(-1.0),
        KeyCode::Right | KeyCode::Char('l') => app.nudge(1.0),
        KeyCode::Up | KeyCode::Char('k') => match app.focus {
            Focus::Districts => app.previous_district(),
            Focus::Sliders => app.previous_slider(),
        },
        KeyCode::Down | KeyCode::Char('j') => match app.focus {
            Focus::Districts => app.next_district(),
            Focus::Sliders => app.next_slider(),
        },
        _ => {}
    }
}

/// Poll for events with a timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}
