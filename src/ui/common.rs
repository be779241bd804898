//! Common UI components around the chart.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::App;

/// Render the header bar: position in the chart list and series count.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " TOPLOG ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.current() {
        Some(chart) => {
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("{}/{}", app.selected + 1, app.charts.len()),
                Style::default().fg(app.theme.highlight),
            ));
            spans.push(Span::raw(" charts │ "));
            spans.push(Span::styled(
                format!("{}", chart.series.len()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" series │ "));
            spans.push(Span::raw(format!("{} samples", chart.x_max as usize + 1)));
        }
        None => spans.push(Span::raw("| No charts")),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar, one tab per chart.
///
/// Highlights the chart on screen.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .charts
        .iter()
        .enumerate()
        .map(|(i, chart)| {
            if i < 9 {
                Line::from(format!(" {}:{} ", i + 1, chart.title))
            } else {
                Line::from(format!(" {} ", chart.title))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.current() {
        Some(chart) => format!(" {} | Tab:next 1-9:jump ?:help q:quit", chart.title),
        None => " q:quit".to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the chart.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab →/l     Next chart"),
        Line::from("  S-Tab ←/h   Previous chart"),
        Line::from("  1-9         Jump to chart"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?           Toggle help"),
        Line::from("  q/Esc       Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 36u16.min(area.width.saturating_sub(4));
    let help_height = 15u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
