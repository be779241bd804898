//! MetricTable - a time-indexed table of samples, one column per entity.

use std::iter;

use chrono::NaiveDateTime;

use crate::{Sample, TIME_FORMAT};

/// One observation instant: an absolute timestamp and one cell per column.
///
/// Rows built while columns are still being discovered may be shorter than
/// the final header; [`MetricTable::densify`] pads them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Resolved date and time of the snapshot.
    pub time: NaiveDateTime,
    /// Cells in column order. `None` means "not observed".
    pub cells: Vec<Option<Sample>>,
}

impl Row {
    /// Create a row.
    pub fn new(time: NaiveDateTime, cells: Vec<Option<Sample>>) -> Self {
        Self { time, cells }
    }

    /// Number of cells currently held.
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Sample in the given column, if observed.
    pub fn get(&self, column: usize) -> Option<&Sample> {
        self.cells.get(column).and_then(Option::as_ref)
    }
}

/// Kind of a synthetic row appended after the data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SummaryKind {
    /// Per-column maxima.
    Max,
    /// Per-column arithmetic mean over observed cells.
    Average,
}

impl SummaryKind {
    /// Label written in the time column.
    pub fn label(&self) -> &'static str {
        match self {
            SummaryKind::Max => "MAX:",
            SummaryKind::Average => "AVG:",
        }
    }
}

/// A synthetic row (e.g. `MAX:`) with preformatted cells.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryRow {
    pub kind: SummaryKind,
    pub cells: Vec<String>,
}

impl SummaryRow {
    pub fn new(kind: SummaryKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }
}

/// A time-indexed table of samples.
///
/// Column indices passed to and returned from the methods below are entity
/// indices: `0` is the first entity column. The time column only exists in
/// the rendered [`header`](MetricTable::header) and [`grid`](MetricTable::grid),
/// where entity `i` sits at position `i + 1`.
///
/// Summary rows are kept apart from data rows so that anything computed from
/// [`rows`](MetricTable::rows) never sees them.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    summaries: Vec<SummaryRow>,
}

impl MetricTable {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a table from already collected columns and rows.
    pub fn from_parts(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
            summaries: Vec::new(),
        }
    }

    /// Table name, used for output file names and chart titles.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity column labels in column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows in time order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Summary rows in the order they were appended.
    pub fn summaries(&self) -> &[SummaryRow] {
        &self.summaries
    }

    /// Number of entity columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True if the table holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append an entity column and return its index.
    pub fn push_column(&mut self, label: impl Into<String>) -> usize {
        self.columns.push(label.into());
        self.columns.len() - 1
    }

    /// Append a data row.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Pad every row with empty cells up to the column count.
    ///
    /// Only appends; populated cells keep their positions. Returns the number
    /// of cells added.
    pub fn densify(&mut self) -> usize {
        let width = self.columns.len();
        let mut added = 0;
        for row in &mut self.rows {
            if row.cells.len() < width {
                added += width - row.cells.len();
                row.cells.resize(width, None);
            }
        }
        added
    }

    /// True if every row has exactly one cell per column.
    pub fn is_dense(&self) -> bool {
        self.rows.iter().all(|row| row.width() == self.columns.len())
    }

    /// Keep only the rows matching the predicate. Returns how many were removed.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Row) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Iterate over the observed samples of one column.
    pub fn column_samples(&self, column: usize) -> impl Iterator<Item = &Sample> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// Indices of columns without a single observed sample, ascending.
    pub fn empty_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&column| self.column_samples(column).next().is_none())
            .collect()
    }

    /// Remove columns from the header, every data row and every summary row.
    ///
    /// Indices may be given in any order; duplicates and out-of-range indices
    /// are ignored. Removal runs from the highest index down so that pending
    /// indices stay valid.
    pub fn remove_columns(&mut self, columns: &[usize]) {
        let mut doomed: Vec<usize> = columns
            .iter()
            .copied()
            .filter(|&column| column < self.columns.len())
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        doomed.dedup();

        for &column in &doomed {
            self.columns.remove(column);
            for row in &mut self.rows {
                if column < row.cells.len() {
                    row.cells.remove(column);
                }
            }
            for summary in &mut self.summaries {
                if column < summary.cells.len() {
                    summary.cells.remove(column);
                }
            }
        }
    }

    /// Append a summary row, padding its cells to the column count.
    pub fn push_summary(&mut self, mut summary: SummaryRow) {
        summary.cells.resize(self.columns.len(), String::new());
        self.summaries.push(summary);
    }

    /// Rendered header: an empty time column followed by the entity labels.
    pub fn header(&self) -> Vec<String> {
        iter::once(String::new()).chain(self.columns.iter().cloned()).collect()
    }

    /// Rendered cells: data rows, then summary rows, each led by its time
    /// (or summary label). Empty cells render as empty strings.
    pub fn grid(&self) -> Vec<Vec<String>> {
        let width = self.columns.len();
        let data = self.rows.iter().map(|row| {
            let mut line = Vec::with_capacity(width + 1);
            line.push(row.time.format(TIME_FORMAT).to_string());
            line.extend(
                (0..width).map(|column| row.get(column).map(Sample::to_string).unwrap_or_default()),
            );
            line
        });
        let summaries = self.summaries.iter().map(|summary| {
            iter::once(summary.kind.label().to_string())
                .chain(summary.cells.iter().cloned())
                .collect::<Vec<_>>()
        });
        data.chain(summaries).collect()
    }
}
