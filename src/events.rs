use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_chart();
            } else {
                app.next_chart();
            }
        }
        KeyCode::BackTab => app.prev_chart(),
        KeyCode::Right | KeyCode::Char('l') => app.next_chart(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_chart(),

        // Direct chart access
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                app.select(digit as usize - 1);
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ChartData;
    use crate::ui::Theme;

    fn app() -> App {
        let charts = (0..3)
            .map(|i| ChartData {
                title: format!("chart {i}"),
                y_label: "",
                y_max: 1.0,
                x_max: 0.0,
                x_labels: Vec::new(),
                series: Vec::new(),
            })
            .collect();
        App::with_theme(charts, Theme::dark())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_tab_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_digit_jumps() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected, 2);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }
}
