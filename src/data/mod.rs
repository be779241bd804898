//! Turning raw monitor logs into ranked metric tables.
//!
//! ## Submodules
//!
//! - [`clock`]: Resolving times of day to full timestamps across midnight
//! - [`builder`]: Sparse table construction, one snapshot at a time
//! - [`top`]: The `top -b` snapshot parser ([`TopLogParser`])
//! - [`range`]: Time window filtering and empty column pruning ([`TimeRange`])
//! - [`rank`]: Column ranking and `MAX:`/`AVG:` rows ([`RankedTable`])
//! - [`free`]: The `free` memory companion ([`analyze_free`])
//!
//! ## Data Flow
//!
//! ```text
//! LogFile (lines)
//!        │
//!        ▼
//! TopLogParser::parse()  ──▶ one sparse MetricTable per Metric
//!        │
//!        ▼
//! MetricTable::densify()
//!        │
//!        ▼
//! TimeRange::apply()      (rows outside the window, then empty columns)
//!        │
//!        ▼
//! RankedTable::rank()     (order by peak, then the MAX: row)
//! ```

pub mod builder;
pub mod clock;
pub mod free;
pub mod range;
pub mod rank;
pub mod top;

pub use builder::TableBuilder;
pub use clock::{parse_time_of_day, DateResolver};
pub use free::{analyze_free, FreeReport};
pub use range::TimeRange;
pub use rank::RankedTable;
pub use top::{Metric, TopLogParser, DEFAULT_THRESHOLD};

use toplog_types::SummaryKind;
use tracing::info;

use crate::error::Result;
use crate::source::LogFile;

/// Summary rows appended to every `top` table.
pub const TOP_SUMMARIES: [SummaryKind; 1] = [SummaryKind::Max];

/// Run the full `top` pipeline over one loaded log.
///
/// Returns one ranked table per [`Metric`], in [`Metric::ALL`] order. Fails
/// only if the file name carries no usable start date.
pub fn analyze_top(
    log: &LogFile,
    threshold: f64,
    range: &TimeRange,
) -> Result<Vec<(Metric, RankedTable)>> {
    let start = log.start_date()?;
    let stem = log.stem();

    let tables = TopLogParser::parse(start, threshold, log.lines())
        .into_iter()
        .map(|(metric, mut table)| {
            let added = table.densify();
            range.apply(&mut table);
            info!(
                file = %stem,
                metric = metric.label(),
                rows = table.row_count(),
                columns = table.column_count(),
                densified = added,
                "table built"
            );
            (metric, RankedTable::rank(table, &TOP_SUMMARIES))
        })
        .collect();

    Ok(tables)
}

/// Run the `free` pipeline over one loaded log.
pub fn analyze_free_log(log: &LogFile, range: &TimeRange) -> Result<FreeReport> {
    let stem = log.stem();
    let report = analyze_free(log.path(), log.lines(), &stem, range)?;
    info!(
        file = %stem,
        rows = report.table.table().row_count(),
        total = report.total,
        "memory table built"
    );
    Ok(report)
}
