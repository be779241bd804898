//! Chart data for the terminal viewer.
//!
//! Rendering lives in [`crate::ui`]. This module only decides what goes on a
//! chart: which columns, the axis bounds and the time labels.

use chrono::NaiveDateTime;

use crate::data::{FreeReport, RankedTable};

/// Y axis title for percentage metrics.
pub const RATE_AXIS: &str = "Use Rate [%]";

/// Y axis title for absolute memory.
pub const MEMORY_AXIS: &str = "Memory [KB]";

/// Default number of x axis labels.
pub const DEFAULT_TICK_COUNT: usize = 10;

const TICK_FORMAT: &str = "%m-%d %H:%M:%S";

/// One line on a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    /// `(row index, value)`. Rows without a value for this column have no
    /// point.
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub y_label: &'static str,
    pub y_max: f64,
    /// Last row index. The x axis runs from 0 to this.
    pub x_max: f64,
    pub x_labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    /// Chart of the `limit` highest ranked columns of a percentage table.
    ///
    /// Returns `None` for a table without data rows.
    pub fn top(
        title: impl Into<String>,
        table: &RankedTable,
        limit: usize,
        tick_count: usize,
    ) -> Option<Self> {
        let columns = table.top(limit).get(1..).unwrap_or_default();
        Self::build(title.into(), table, columns, RATE_AXIS, 100.0, tick_count)
    }

    /// Chart of used memory against the machine's total.
    ///
    /// Returns `None` for a report without data rows.
    pub fn memory(title: impl Into<String>, report: &FreeReport, tick_count: usize) -> Option<Self> {
        Self::build(
            title.into(),
            &report.table,
            &[FreeReport::USED_COLUMN],
            MEMORY_AXIS,
            report.total as f64,
            tick_count,
        )
    }

    fn build(
        title: String,
        ranked: &RankedTable,
        grid_columns: &[usize],
        y_label: &'static str,
        y_max: f64,
        tick_count: usize,
    ) -> Option<Self> {
        let table = ranked.table();
        if table.is_empty() {
            return None;
        }

        let series = grid_columns
            .iter()
            .filter_map(|&grid| {
                let column = grid.checked_sub(1)?;
                let label = table.columns().get(column)?.clone();
                let points = table
                    .rows()
                    .iter()
                    .enumerate()
                    .filter_map(|(x, row)| row.get(column).map(|sample| (x as f64, sample.value())))
                    .collect();
                Some(Series { label, points })
            })
            .collect();

        let times: Vec<NaiveDateTime> = table.rows().iter().map(|row| row.time).collect();

        Some(Self {
            title,
            y_label,
            y_max,
            x_max: (times.len() - 1) as f64,
            x_labels: tick_labels(&times, tick_count),
            series,
        })
    }
}

/// Pick at most `count` evenly spaced time labels, always including the
/// first and last time.
pub fn tick_labels(times: &[NaiveDateTime], count: usize) -> Vec<String> {
    let count = count.min(times.len());
    match count {
        0 => Vec::new(),
        1 => vec![times[0].format(TICK_FORMAT).to_string()],
        _ => {
            let last = times.len() - 1;
            (0..count)
                .map(|i| {
                    let index = (i * last + (count - 1) / 2) / (count - 1);
                    times[index].format(TICK_FORMAT).to_string()
                })
                .collect()
        }
    }
}
