//! Line chart of one metric table.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use crate::app::App;
use crate::export::ChartData;

/// Render the selected chart, or a placeholder when there is none.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(data) = app.current() else {
        let paragraph = Paragraph::new("No tables with data rows to chart")
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block(app, " Charts "));
        frame.render_widget(paragraph, area);
        return;
    };

    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            // A line needs two points; a lone sample would not be drawn.
            let graph_type = if series.points.len() > 1 {
                GraphType::Line
            } else {
                GraphType::Scatter
            };
            Dataset::default()
                .name(series.label.as_str())
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(app.theme.series_color(i)))
                .data(&series.points)
        })
        .collect();

    let x_axis = Axis::default()
        .title(Span::styled("Time", app.theme.axis))
        .style(app.theme.axis)
        .bounds([0.0, data.x_max.max(1.0)])
        .labels(data.x_labels.iter().map(String::as_str));

    let y_axis = Axis::default()
        .title(Span::styled(data.y_label, app.theme.axis))
        .style(app.theme.axis)
        .bounds([0.0, data.y_max.max(1.0)])
        .labels(y_labels(data));

    let chart = Chart::new(datasets)
        .block(block(app, &format!(" {} ", data.title)))
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, area);
}

fn block<'a>(app: &App, title: &str) -> Block<'a> {
    Block::bordered()
        .title(Span::styled(title.to_string(), app.theme.header))
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

/// Bottom, middle and top of the y axis.
fn y_labels(data: &ChartData) -> Vec<String> {
    let max = data.y_max.max(1.0);
    [0.0, max / 2.0, max].iter().map(|v| format!("{v:.0}")).collect()
}
