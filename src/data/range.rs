//! Time window filtering.

use chrono::NaiveDateTime;
use toplog_types::MetricTable;
use tracing::debug;

/// An inclusive time window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Create a window from optional bounds.
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// A window that admits everything.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check whether a timestamp lies inside the window.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| time >= start) && self.end.map_or(true, |end| time <= end)
    }

    /// Drop rows outside the window, keeping every column.
    ///
    /// Returns the number of rows removed.
    pub fn retain_rows(&self, table: &mut MetricTable) -> usize {
        if self.is_unbounded() {
            return 0;
        }
        table.retain_rows(|row| self.contains(row.time))
    }

    /// Drop rows outside the window, then drop columns left without a
    /// single observed value.
    ///
    /// Must run before summary rows are appended. With both bounds open the
    /// table is left untouched, including columns that were already empty.
    pub fn apply(&self, table: &mut MetricTable) {
        if self.is_unbounded() {
            return;
        }

        let removed_rows = self.retain_rows(table);
        let empty = table.empty_columns();
        table.remove_columns(&empty);

        debug!(
            table = table.name(),
            removed_rows,
            removed_columns = empty.len(),
            remaining_rows = table.row_count(),
            "time range applied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use toplog_types::{Row, Sample};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    fn cell(text: &str) -> Option<Sample> {
        Sample::parse(text)
    }

    /// Column "early" only has data at 09:00, "steady" everywhere.
    fn table() -> MetricTable {
        MetricTable::from_parts(
            "cpu",
            vec!["1(early)".into(), "2(steady)".into()],
            vec![
                Row::new(at(9), vec![cell("8.0"), cell("1.0")]),
                Row::new(at(10), vec![None, cell("2.0")]),
                Row::new(at(11), vec![None, cell("3.0")]),
            ],
        )
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = TimeRange::new(Some(at(10)), Some(at(11)));
        assert!(!range.contains(at(9)));
        assert!(range.contains(at(10)));
        assert!(range.contains(at(11)));
        assert!(!range.contains(at(12)));
    }

    #[test]
    fn test_open_sides() {
        assert!(TimeRange::new(None, Some(at(10))).contains(at(0)));
        assert!(TimeRange::new(Some(at(10)), None).contains(at(23)));
    }

    #[test]
    fn test_unbounded_leaves_table_identical() {
        let mut filtered = table();
        filtered.push_column("3(never)");
        filtered.densify();
        let original = filtered.clone();

        TimeRange::unbounded().apply(&mut filtered);

        assert_eq!(filtered, original);
        assert_eq!(filtered.grid(), original.grid());
    }

    #[test]
    fn test_single_instant_window() {
        let mut filtered = table();
        TimeRange::new(Some(at(10)), Some(at(10))).apply(&mut filtered);

        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.rows()[0].time, at(10));
    }

    #[test]
    fn test_prunes_columns_emptied_by_filter() {
        let mut filtered = table();
        TimeRange::new(Some(at(10)), None).apply(&mut filtered);

        assert_eq!(filtered.header(), vec!["", "2(steady)"]);
        for row in filtered.rows() {
            assert_eq!(row.width(), 1);
        }
        assert_eq!(
            filtered.grid(),
            vec![vec!["2024-01-01 10:00:00", "2.0"], vec!["2024-01-01 11:00:00", "3.0"]]
        );
    }

    #[test]
    fn test_window_excluding_everything() {
        let mut filtered = table();
        TimeRange::new(Some(at(20)), None).apply(&mut filtered);

        assert!(filtered.is_empty());
        assert_eq!(filtered.column_count(), 0);
        assert_eq!(filtered.header(), vec![""]);
    }

    #[test]
    fn test_retain_rows_keeps_columns() {
        let mut filtered = table();
        let removed = TimeRange::new(Some(at(10)), None).retain_rows(&mut filtered);
        assert_eq!(removed, 1);
        assert_eq!(filtered.column_count(), 2);
    }
}
