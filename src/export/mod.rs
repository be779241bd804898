//! Output artifacts: CSV files on disk and chart data for the viewer.
//!
//! Artifact names derive from the input file stem, so that several logs
//! processed in one run never overwrite each other's results.

pub mod chart;
mod csv;
mod xlsx;

pub use self::chart::{tick_labels, ChartData, Series, DEFAULT_TICK_COUNT};
pub use self::csv::{write_table, write_table_file};
pub use self::xlsx::{write_workbook, SHEET_NAME};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::{FreeReport, Metric, RankedTable};
use crate::error::{AnalyzeError, Result};

/// File name of the CSV written for one `top` metric.
pub fn top_artifact_name(stem: &str, metric: Metric) -> String {
    format!("{stem}_{}_result.csv", metric.label())
}

/// File name of the workbook written for one `top` metric.
pub fn top_workbook_name(stem: &str, metric: Metric) -> String {
    format!("{stem}_{}_result.xlsx", metric.label())
}

/// File name of the CSV written for one `free` log.
pub fn free_artifact_name(stem: &str) -> String {
    format!("{stem}_result.csv")
}

/// Create the output directory and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| AnalyzeError::io(dir, e))
}

/// Write one CSV per metric table. Returns the paths written.
pub fn export_top(
    dir: &Path,
    stem: &str,
    tables: &[(Metric, RankedTable)],
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    tables
        .iter()
        .map(|(metric, table)| write_artifact(table, dir.join(top_artifact_name(stem, *metric))))
        .collect()
}

/// Write one workbook per metric table, each charting the `limit` highest
/// ranked columns. Returns the paths written.
pub fn export_top_workbooks(
    dir: &Path,
    stem: &str,
    tables: &[(Metric, RankedTable)],
    limit: usize,
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    tables
        .iter()
        .map(|(metric, table)| {
            let path = dir.join(top_workbook_name(stem, *metric));
            write_workbook(table, limit, &path)?;
            info!(path = %path.display(), rows = table.table().row_count(), "wrote workbook");
            Ok(path)
        })
        .collect()
}

/// Write the CSV for one memory report. Returns the path written.
pub fn export_free(dir: &Path, stem: &str, report: &FreeReport) -> Result<PathBuf> {
    ensure_dir(dir)?;
    write_artifact(&report.table, dir.join(free_artifact_name(stem)))
}

fn write_artifact(table: &RankedTable, path: PathBuf) -> Result<PathBuf> {
    write_table_file(table, &path)?;
    info!(path = %path.display(), rows = table.table().row_count(), "wrote CSV");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use toplog_types::{MetricTable, SummaryKind};

    #[test]
    fn test_artifact_names() {
        assert_eq!(top_artifact_name("top_20240101", Metric::Memory), "top_20240101_memory_result.csv");
        assert_eq!(top_artifact_name("top_20240101", Metric::Cpu), "top_20240101_cpu_result.csv");
        assert_eq!(free_artifact_name("free_20240101"), "free_20240101_result.csv");
        assert_eq!(top_workbook_name("top_20240101", Metric::Cpu), "top_20240101_cpu_result.xlsx");
    }

    #[test]
    fn test_export_top_creates_dir() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let tables: Vec<_> = Metric::ALL
            .iter()
            .map(|&metric| {
                let table = MetricTable::new(metric.label());
                (metric, RankedTable::rank(table, &[SummaryKind::Max]))
            })
            .collect();

        let written = export_top(&out, "top_20240101", &tables).unwrap();

        assert_eq!(written.len(), 2);
        assert!(out.join("top_20240101_memory_result.csv").is_file());
        assert!(out.join("top_20240101_cpu_result.csv").is_file());
    }

    #[test]
    fn test_export_top_workbooks() {
        let dir = tempdir().unwrap();
        let tables: Vec<_> = Metric::ALL
            .iter()
            .map(|&metric| {
                let table = MetricTable::new(metric.label());
                (metric, RankedTable::rank(table, &[SummaryKind::Max]))
            })
            .collect();

        let written = export_top_workbooks(dir.path(), "top_20240101", &tables, 5).unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("top_20240101_memory_result.xlsx"),
                dir.path().join("top_20240101_cpu_result.xlsx"),
            ]
        );
        assert!(written.iter().all(|path| path.is_file()));
    }
}
