//! Snapshot parsing for `top -b` logs.
//!
//! A log is a sequence of batch-mode screens:
//!
//! ```text
//! top - 23:59:00 up 10 days,  2:03,  1 user,  load average: 0.00, 0.01, 0.05
//! Tasks: 201 total,   1 running, 200 sleeping,   0 stopped,   0 zombie
//! ...
//!     PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND
//!    1234 root      20   0  123456  12345   1234 S   5.0   1.2   0:01.23 myproc
//! ```
//!
//! The `top -` line opens a snapshot, the `PID` line opens its process
//! table, and each table row contributes one value per tracked metric.

use chrono::{NaiveDate, NaiveDateTime};
use toplog_types::{EntityId, MetricTable, Sample};
use tracing::{debug, warn};

use super::builder::TableBuilder;
use super::clock::{parse_time_of_day, DateResolver};

/// Prefix of the summary line that starts every snapshot.
pub const BOUNDARY_PREFIX: &str = "top -";

/// Values below this are treated as not observed.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

const HEADER_FIELD: &str = "PID";
const TIME_FIELD: usize = 2;
const PID_FIELD: usize = 0;
const CPU_FIELD: usize = 8;
const MEM_FIELD: usize = 9;
const COMMAND_FIELD: usize = 11;
const ROW_FIELD_COUNT: usize = 12;

/// A per-process metric read from the process table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// `%MEM` column.
    Memory,
    /// `%CPU` column.
    Cpu,
}

impl Metric {
    /// Every metric, in output order.
    pub const ALL: [Metric; 2] = [Metric::Memory, Metric::Cpu];

    /// Short name used in table names and file names.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Memory => "memory",
            Metric::Cpu => "cpu",
        }
    }

    fn field(&self) -> usize {
        match self {
            Metric::Memory => MEM_FIELD,
            Metric::Cpu => CPU_FIELD,
        }
    }
}

/// Line-by-line parser for one `top` log.
///
/// Feed every line in order, then call [`finish`](TopLogParser::finish).
/// Each snapshot becomes one row per metric table, stamped with the time
/// printed on its own `top -` line.
///
/// Process table rows that do not have exactly twelve fields (e.g. a
/// command name containing spaces) are skipped, as are rows outside a
/// `PID` block.
#[derive(Debug)]
pub struct TopLogParser {
    resolver: DateResolver,
    threshold: f64,
    builders: Vec<(Metric, TableBuilder)>,
    current_time: Option<NaiveDateTime>,
    in_table: bool,
    snapshots: usize,
    skipped: usize,
}

impl TopLogParser {
    /// Create a parser tracking every [`Metric`].
    pub fn new(start: NaiveDate, threshold: f64) -> Self {
        Self::with_metrics(start, threshold, &Metric::ALL)
    }

    /// Create a parser tracking the given metrics only.
    pub fn with_metrics(start: NaiveDate, threshold: f64, metrics: &[Metric]) -> Self {
        Self {
            resolver: DateResolver::new(start),
            threshold,
            builders: metrics
                .iter()
                .map(|&metric| (metric, TableBuilder::new(metric.label())))
                .collect(),
            current_time: None,
            in_table: false,
            snapshots: 0,
            skipped: 0,
        }
    }

    /// Parse a whole log in one call.
    pub fn parse<I, S>(start: NaiveDate, threshold: f64, lines: I) -> Vec<(Metric, MetricTable)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parser = Self::new(start, threshold);
        for line in lines {
            parser.feed(line.as_ref());
        }
        parser.finish()
    }

    /// Consume one line.
    pub fn feed(&mut self, line: &str) {
        if line.starts_with(BOUNDARY_PREFIX) {
            self.start_snapshot(line);
            return;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.first() == Some(&HEADER_FIELD) {
            self.in_table = true;
            return;
        }
        if !self.in_table || fields.is_empty() {
            return;
        }
        if fields.len() != ROW_FIELD_COUNT {
            self.skipped += 1;
            return;
        }
        self.record_row(&fields);
    }

    /// Flush the trailing snapshot and return one table per metric.
    ///
    /// Tables are sparse; run [`MetricTable::densify`] before using them.
    pub fn finish(mut self) -> Vec<(Metric, MetricTable)> {
        self.flush();
        debug!(
            snapshots = self.snapshots,
            skipped_rows = self.skipped,
            "top log parsed"
        );
        self.builders
            .into_iter()
            .map(|(metric, builder)| (metric, builder.finish()))
            .collect()
    }

    fn start_snapshot(&mut self, line: &str) {
        // The previous snapshot is complete: stamp it with its own time.
        self.flush();
        self.in_table = false;

        let field = line.split_whitespace().nth(TIME_FIELD).unwrap_or_default();
        self.current_time = match parse_time_of_day(field) {
            Some(time) => Some(self.resolver.resolve(time)),
            None => {
                warn!(line, "snapshot header without a readable time, dropping snapshot");
                None
            }
        };
    }

    fn flush(&mut self) {
        let mut emitted = false;
        for (_, builder) in &mut self.builders {
            emitted |= builder.flush(self.current_time);
        }
        if emitted {
            self.snapshots += 1;
        }
    }

    fn record_row(&mut self, fields: &[&str]) {
        let Ok(pid) = fields[PID_FIELD].parse::<u32>() else {
            self.skipped += 1;
            return;
        };
        let entity = EntityId::new(pid, fields[COMMAND_FIELD]);

        for (metric, builder) in &mut self.builders {
            // An unreadable field only costs this metric its cell.
            let Some(sample) = Sample::parse(fields[metric.field()]) else {
                self.skipped += 1;
                continue;
            };
            // Below threshold means absent, not zero: no cell, and no column
            // for an entity that never qualifies.
            if sample.value() >= self.threshold {
                builder.record(&entity, sample);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "    PID USER      PR  NI    VIRT    RES    SHR S  %CPU  %MEM     TIME+ COMMAND";

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn boundary(time: &str) -> String {
        format!("top - {time} up 10 days,  2:03,  1 user,  load average: 0.00, 0.01, 0.05")
    }

    fn row(pid: u32, cpu: &str, mem: &str, command: &str) -> String {
        format!("{pid:>7} root      20   0  123456  12345   1234 S  {cpu:>4}  {mem:>4}   0:01.23 {command}")
    }

    fn table(tables: &[(Metric, MetricTable)], metric: Metric) -> MetricTable {
        let mut table = tables.iter().find(|(m, _)| *m == metric).unwrap().1.clone();
        table.densify();
        table
    }

    #[test]
    fn test_rows_stamped_with_their_own_snapshot_time() {
        let lines = vec![
            boundary("23:59:00"),
            "Tasks: 1 total".to_string(),
            HEADER.to_string(),
            row(1234, "5.0", "2.0", "myproc"),
            String::new(),
            boundary("00:01:00"),
            HEADER.to_string(),
            row(1234, "7.0", "2.5", "myproc"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);

        assert_eq!(cpu.header(), vec!["", "1234(myproc)"]);
        assert_eq!(
            cpu.grid(),
            vec![
                vec!["2024-01-01 23:59:00", "5.0"],
                vec!["2024-01-02 00:01:00", "7.0"],
            ]
        );

        let memory = table(&tables, Metric::Memory);
        assert_eq!(memory.grid()[1], vec!["2024-01-02 00:01:00", "2.5"]);
    }

    #[test]
    fn test_below_threshold_is_absent() {
        let lines = vec![
            boundary("10:00:00"),
            HEADER.to_string(),
            row(1, "0.3", "0.1", "idle"),
            row(2, "3.0", "0.0", "busy"),
            boundary("10:00:03"),
            HEADER.to_string(),
            row(1, "4.0", "0.1", "idle"),
            row(2, "0.5", "0.0", "busy"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);

        // "busy" qualified first, so it owns column 0.
        assert_eq!(cpu.columns(), ["2(busy)".to_string(), "1(idle)".to_string()]);
        assert_eq!(cpu.grid()[0], vec!["2024-01-01 10:00:00", "3.0", ""]);
        assert_eq!(cpu.grid()[1], vec!["2024-01-01 10:00:03", "", "4.0"]);

        // Nothing ever reached the memory threshold.
        let memory = table(&tables, Metric::Memory);
        assert_eq!(memory.column_count(), 0);
        assert_eq!(memory.row_count(), 2);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let lines = vec![
            boundary("10:00:00"),
            HEADER.to_string(),
            row(1, "9.0", "9.0", "python3 -m http.server"),
            "   42 root 20 0 1 1 1 S".to_string(),
            row(3, "abc", "2.0", "weird"),
            row(4, "2.0", "2.0", "ok"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);

        assert_eq!(cpu.columns(), ["4(ok)".to_string()]);
    }

    #[test]
    fn test_bad_field_only_drops_its_metric() {
        let lines = vec![
            boundary("10:00:00"),
            HEADER.to_string(),
            row(5, "?", "40.0", "odd"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);

        assert_eq!(table(&tables, Metric::Cpu).column_count(), 0);
        let memory = table(&tables, Metric::Memory);
        assert_eq!(memory.columns(), ["5(odd)".to_string()]);
        assert_eq!(memory.grid()[0], vec!["2024-01-01 10:00:00", "40.0"]);
    }

    #[test]
    fn test_rows_outside_pid_block_ignored() {
        let lines = vec![
            row(9, "50.0", "50.0", "early"),
            boundary("10:00:00"),
            row(8, "50.0", "50.0", "nohdr"),
            HEADER.to_string(),
            row(7, "50.0", "50.0", "real"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);

        assert_eq!(cpu.columns(), ["7(real)".to_string()]);
        assert_eq!(cpu.row_count(), 1);
    }

    #[test]
    fn test_no_boundary_yields_empty_tables() {
        let lines = vec![HEADER.to_string(), row(1, "5.0", "5.0", "x")];
        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);

        assert_eq!(tables.len(), 2);
        for (_, table) in &tables {
            assert!(table.is_empty());
            assert_eq!(table.column_count(), 0);
        }
    }

    #[test]
    fn test_empty_snapshot_still_produces_row() {
        let lines = vec![boundary("10:00:00"), boundary("10:00:03"), HEADER.to_string()];
        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);
        assert_eq!(cpu.row_count(), 2);
    }

    #[test]
    fn test_unreadable_time_drops_that_snapshot() {
        let lines = vec![
            boundary("10:00:00"),
            HEADER.to_string(),
            row(1, "2.0", "2.0", "a"),
            "top - garbage".to_string(),
            HEADER.to_string(),
            row(1, "3.0", "3.0", "a"),
            boundary("10:00:06"),
            HEADER.to_string(),
            row(1, "4.0", "4.0", "a"),
        ];

        let tables = TopLogParser::parse(start(), DEFAULT_THRESHOLD, &lines);
        let cpu = table(&tables, Metric::Cpu);

        assert_eq!(
            cpu.grid(),
            vec![vec!["2024-01-01 10:00:00", "2.0"], vec!["2024-01-01 10:00:06", "4.0"]]
        );
    }

    #[test]
    fn test_custom_threshold() {
        let lines = vec![boundary("10:00:00"), HEADER.to_string(), row(1, "2.0", "2.0", "a")];
        let tables = TopLogParser::parse(start(), 2.5, &lines);
        assert_eq!(table(&tables, Metric::Cpu).column_count(), 0);

        let tables = TopLogParser::parse(start(), 2.0, &lines);
        assert_eq!(table(&tables, Metric::Cpu).column_count(), 1);
    }

    #[test]
    fn test_single_metric_parser() {
        let mut parser = TopLogParser::with_metrics(start(), DEFAULT_THRESHOLD, &[Metric::Cpu]);
        for line in [boundary("10:00:00"), HEADER.to_string(), row(1, "2.0", "2.0", "a")] {
            parser.feed(&line);
        }
        let tables = parser.finish();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].0, Metric::Cpu);
    }
}
