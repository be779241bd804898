//! Column ranking and summary rows.
//!
//! Ranking orders entity columns by their peak value so that exporters can
//! show the heaviest processes first and charts can cap themselves at the
//! top N. Peaks are always taken from data rows: summary rows are appended
//! only after the order is fixed.

use toplog_types::{MetricTable, Sample, SummaryKind, SummaryRow};

/// Text written for the peak of a column without observations.
const EMPTY_PEAK: &str = "0.0";

/// Peak sample of every entity column, `None` for columns never observed.
///
/// Ties keep the earliest row's sample.
pub fn column_peaks(table: &MetricTable) -> Vec<Option<&Sample>> {
    (0..table.column_count())
        .map(|column| {
            table.column_samples(column).fold(None, |best: Option<&Sample>, sample| match best {
                Some(best) if best.value() >= sample.value() => Some(best),
                _ => Some(sample),
            })
        })
        .collect()
}

/// Grid column order: the time column first, then entity columns by peak,
/// highest first.
///
/// Indices are grid positions (entity `i` is `i + 1`). Columns with equal
/// peaks keep their original relative order, and unobserved columns rank as
/// a peak of 0.0.
pub fn ranked_order(table: &MetricTable) -> Vec<usize> {
    let peaks: Vec<f64> = column_peaks(table)
        .into_iter()
        .map(|peak| peak.map_or(0.0, Sample::value))
        .collect();

    let mut entities: Vec<usize> = (0..peaks.len()).collect();
    entities.sort_by(|&a, &b| peaks[b].total_cmp(&peaks[a]));

    std::iter::once(0).chain(entities.into_iter().map(|column| column + 1)).collect()
}

/// The `MAX:` row: each column's peak in its original text.
pub fn max_row(table: &MetricTable) -> SummaryRow {
    let cells = column_peaks(table)
        .into_iter()
        .map(|peak| peak.map_or_else(|| EMPTY_PEAK.to_string(), Sample::to_string))
        .collect();
    SummaryRow::new(SummaryKind::Max, cells)
}

/// The `AVG:` row: each column's mean over observed cells, one decimal.
/// Columns without observations stay empty.
pub fn average_row(table: &MetricTable) -> SummaryRow {
    let cells = (0..table.column_count())
        .map(|column| {
            let (sum, count) = table
                .column_samples(column)
                .fold((0.0, 0usize), |(sum, count), sample| (sum + sample.value(), count + 1));
            if count == 0 {
                String::new()
            } else {
                format!("{:.1}", sum / count as f64)
            }
        })
        .collect();
    SummaryRow::new(SummaryKind::Average, cells)
}

/// Build a summary row of the given kind.
pub fn summary_row(table: &MetricTable, kind: SummaryKind) -> SummaryRow {
    match kind {
        SummaryKind::Max => max_row(table),
        SummaryKind::Average => average_row(table),
    }
}

/// A finished table together with the column order exporters should use.
#[derive(Debug, Clone)]
pub struct RankedTable {
    table: MetricTable,
    order: Vec<usize>,
}

impl RankedTable {
    /// Rank a dense, filtered table by column peak, then append summaries.
    pub fn rank(table: MetricTable, summaries: &[SummaryKind]) -> Self {
        let order = ranked_order(&table);
        Self::with_order(table, order, summaries)
    }

    /// Keep the table's own column order, then append summaries.
    pub fn natural(table: MetricTable, summaries: &[SummaryKind]) -> Self {
        let order = (0..=table.column_count()).collect();
        Self::with_order(table, order, summaries)
    }

    fn with_order(mut table: MetricTable, order: Vec<usize>, summaries: &[SummaryKind]) -> Self {
        for &kind in summaries {
            let row = summary_row(&table, kind);
            table.push_summary(row);
        }
        Self { table, order }
    }

    /// The underlying table, in its original column order.
    pub fn table(&self) -> &MetricTable {
        &self.table
    }

    /// Full grid column order, time column first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The time column plus at most `limit` highest ranked columns.
    pub fn top(&self, limit: usize) -> &[usize] {
        &self.order[..self.order.len().min(limit + 1)]
    }

    /// Header in ranked order.
    pub fn header(&self) -> Vec<String> {
        project(&self.table.header(), &self.order)
    }

    /// Data and summary rows in ranked order.
    pub fn grid(&self) -> Vec<Vec<String>> {
        self.table.grid().iter().map(|line| project(line, &self.order)).collect()
    }
}

fn project(line: &[String], order: &[usize]) -> Vec<String> {
    order.iter().map(|&column| line[column].clone()).collect()
}
