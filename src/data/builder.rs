//! Sparse table construction from per-snapshot observations.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use toplog_types::{EntityId, MetricTable, Row, Sample};
use tracing::debug;

/// Accumulates one snapshot at a time into rows of a [`MetricTable`].
///
/// Columns are assigned the first time an entity is recorded and keep that
/// index for the rest of the log. Rows are cut at the column count known
/// when they were flushed, so the finished table is sparse until
/// [`MetricTable::densify`] runs.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    index: HashMap<EntityId, usize>,
    columns: Vec<EntityId>,
    pending: HashMap<usize, Sample>,
    rows: Vec<Row>,
}

impl TableBuilder {
    /// Create a builder for a table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: HashMap::new(),
            columns: Vec::new(),
            pending: HashMap::new(),
            rows: Vec::new(),
        }
    }

    /// Number of columns discovered so far.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Entities in column order.
    pub fn columns(&self) -> &[EntityId] {
        &self.columns
    }

    /// Record a value for the current snapshot.
    ///
    /// A second value for the same entity within one snapshot replaces the
    /// first.
    pub fn record(&mut self, entity: &EntityId, sample: Sample) {
        let column = match self.index.get(entity) {
            Some(&column) => column,
            None => {
                let column = self.columns.len();
                self.index.insert(entity.clone(), column);
                self.columns.push(entity.clone());
                column
            }
        };
        self.pending.insert(column, sample);
    }

    /// Close the current snapshot.
    ///
    /// Emits a row stamped `time` and returns true, unless `time` is `None`,
    /// in which case the accumulated values are dropped. The snapshot is
    /// reset either way.
    pub fn flush(&mut self, time: Option<NaiveDateTime>) -> bool {
        let Some(time) = time else {
            self.pending.clear();
            return false;
        };

        let mut cells = vec![None; self.columns.len()];
        for (column, sample) in self.pending.drain() {
            cells[column] = Some(sample);
        }
        debug!(table = %self.name, %time, width = cells.len(), "row flushed");
        self.rows.push(Row::new(time, cells));
        true
    }

    /// Finish building. Values recorded since the last flush are dropped.
    pub fn finish(self) -> MetricTable {
        let columns = self.columns.iter().map(EntityId::label).collect();
        MetricTable::from_parts(self.name, columns, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, minute, 0).unwrap()
    }

    fn value(text: &str) -> Sample {
        Sample::parse(text).unwrap()
    }

    #[test]
    fn test_columns_in_first_seen_order() {
        let mut builder = TableBuilder::new("cpu");
        builder.record(&EntityId::new(20, "b"), value("3.0"));
        builder.record(&EntityId::new(10, "a"), value("2.0"));
        builder.flush(Some(at(0)));

        let table = builder.finish();
        assert_eq!(table.columns(), ["20(b)".to_string(), "10(a)".to_string()]);
        assert_eq!(table.rows()[0].get(1), Some(&value("2.0")));
    }

    #[test]
    fn test_rows_are_sparse_until_densified() {
        let mut builder = TableBuilder::new("cpu");
        builder.record(&EntityId::new(1, "a"), value("1.0"));
        builder.flush(Some(at(0)));
        builder.record(&EntityId::new(2, "b"), value("2.0"));
        builder.flush(Some(at(1)));

        let mut table = builder.finish();
        assert_eq!(table.rows()[0].width(), 1);
        assert_eq!(table.rows()[1].width(), 2);

        table.densify();
        assert!(table.is_dense());
        assert_eq!(table.rows()[0].get(1), None);
    }

    #[test]
    fn test_flush_without_time_drops_snapshot() {
        let mut builder = TableBuilder::new("cpu");
        builder.record(&EntityId::new(1, "a"), value("1.0"));
        assert!(!builder.flush(None));
        assert!(builder.flush(Some(at(0))));

        let table = builder.finish();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows()[0].get(0), None);
        // The column stays: it was discovered, only the row was discarded.
        assert_eq!(table.column_count(), 1);
    }

    #[test]
    fn test_repeated_entity_in_one_snapshot_keeps_last() {
        let mut builder = TableBuilder::new("mem");
        let id = EntityId::new(7, "dup");
        builder.record(&id, value("1.0"));
        builder.record(&id, value("4.0"));
        builder.flush(Some(at(0)));

        let table = builder.finish();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.rows()[0].get(0), Some(&value("4.0")));
    }
}
