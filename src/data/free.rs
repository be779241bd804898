//! Memory usage from timestamped `free` logs.
//!
//! Each sample is three lines, all prefixed with the date and time:
//!
//! ```text
//! 2024-01-01 10:00:00               total        used        free      shared  buff/cache   available
//! 2024-01-01 10:00:00 Mem:       16303428     4311084     8530756      402212     3461588    11259756
//! 2024-01-01 10:00:00 Swap:       2097148           0     2097148
//! ```
//!
//! The table has two fixed columns, available memory and used memory
//! (total minus available), both in KiB.

use std::path::Path;

use chrono::NaiveDateTime;
use toplog_types::{MetricTable, Row, Sample, SummaryKind, TIME_FORMAT};
use tracing::debug;

use super::range::TimeRange;
use super::rank::RankedTable;
use crate::error::{AnalyzeError, Result};

/// Label of the memory line.
pub const MEM_LABEL: &str = "Mem:";

/// Label of the derived used-memory column.
pub const USED_LABEL: &str = "use memory";

const DEFAULT_AVAILABLE_LABEL: &str = "available";
const LABEL_FIELD: usize = 2;
const TOTAL_FIELD: usize = 3;
const AVAILABLE_FIELD: usize = 8;
const AVAILABLE_NAME_FIELD: usize = 7;

/// Summary rows appended to every memory table.
pub const FREE_SUMMARIES: [SummaryKind; 2] = [SummaryKind::Max, SummaryKind::Average];

/// A finished memory table and the total it was computed against.
#[derive(Debug, Clone)]
pub struct FreeReport {
    /// Total physical memory in KiB, from the first `Mem:` line.
    pub total: u64,
    /// Available and used memory over time, with `MAX:` and `AVG:` rows.
    pub table: RankedTable,
}

impl FreeReport {
    /// Grid column of the used-memory series.
    pub const USED_COLUMN: usize = 2;
}

/// Build the memory table for one `free` log.
///
/// Fails if the log has no `Mem:` line to read the total from. Lines that
/// do not parse are skipped.
pub fn analyze_free<S: AsRef<str>>(
    path: &Path,
    lines: &[S],
    name: &str,
    range: &TimeRange,
) -> Result<FreeReport> {
    let total = total_memory(lines).ok_or_else(|| AnalyzeError::MissingSummaryField {
        field: MEM_LABEL,
        path: path.to_path_buf(),
    })?;

    let mut table = MetricTable::from_parts(
        name,
        vec![available_label(lines), USED_LABEL.to_string()],
        Vec::new(),
    );

    let mut skipped = 0usize;
    for line in lines {
        let fields: Vec<&str> = line.as_ref().split_whitespace().collect();
        if fields.get(LABEL_FIELD) != Some(&MEM_LABEL) {
            continue;
        }
        match memory_row(&fields, total) {
            Some(row) => {
                if range.contains(row.time) {
                    table.push_row(row);
                }
            }
            None => skipped += 1,
        }
    }

    debug!(
        table = name,
        total,
        rows = table.row_count(),
        skipped,
        "free log parsed"
    );

    Ok(FreeReport {
        total,
        table: RankedTable::natural(table, &FREE_SUMMARIES),
    })
}

fn total_memory<S: AsRef<str>>(lines: &[S]) -> Option<u64> {
    lines.iter().find_map(|line| {
        let fields: Vec<&str> = line.as_ref().split_whitespace().collect();
        if fields.get(LABEL_FIELD) == Some(&MEM_LABEL) {
            fields.get(TOTAL_FIELD)?.parse().ok()
        } else {
            None
        }
    })
}

/// The column name `free` prints for available memory, from the first
/// header line.
fn available_label<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|line| line.as_ref().split_whitespace().collect::<Vec<_>>())
        .find(|fields| fields.get(LABEL_FIELD).is_some_and(|f| *f == "total"))
        .and_then(|fields| fields.get(AVAILABLE_NAME_FIELD).map(|f| f.to_string()))
        .unwrap_or_else(|| DEFAULT_AVAILABLE_LABEL.to_string())
}

fn memory_row(fields: &[&str], total: u64) -> Option<Row> {
    let stamp = format!("{} {}", fields.first()?, fields.get(1)?);
    let time = NaiveDateTime::parse_from_str(&stamp, TIME_FORMAT).ok()?;
    let available: u64 = fields.get(AVAILABLE_FIELD)?.parse().ok()?;
    let used = total.saturating_sub(available);
    Some(Row::new(
        time,
        vec![Some(Sample::from_count(available)), Some(Sample::from_count(used))],
    ))
}
