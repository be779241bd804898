//! Chart viewer state and navigation logic.

use crate::export::ChartData;
use crate::ui::Theme;

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    pub charts: Vec<ChartData>,
    pub selected: usize,

    // UI
    pub theme: Theme,
}

impl App {
    /// Create a viewer over the given charts, with a theme matching the
    /// terminal background.
    pub fn new(charts: Vec<ChartData>) -> Self {
        Self::with_theme(charts, Theme::auto_detect())
    }

    /// Create a viewer with an explicit theme.
    pub fn with_theme(charts: Vec<ChartData>, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            charts,
            selected: 0,
            theme,
        }
    }

    /// The chart on screen, if there is any.
    pub fn current(&self) -> Option<&ChartData> {
        self.charts.get(self.selected)
    }

    /// Move to the next chart, wrapping around.
    pub fn next_chart(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + 1) % self.charts.len();
        }
    }

    /// Move to the previous chart, wrapping around.
    pub fn prev_chart(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + self.charts.len() - 1) % self.charts.len();
        }
    }

    /// Jump to a chart by position. Out of range positions are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.charts.len() {
            self.selected = index;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
