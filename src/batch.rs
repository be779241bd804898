//! Processing a set of logs in one run.
//!
//! Files are handled one at a time, each with its own parser and resolver,
//! so rollover state never carries from one log into the next. A file that
//! fails is logged and counted. The remaining files still run.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Settings;
use crate::data::{analyze_free_log, analyze_top, TimeRange};
use crate::error::Result;
use crate::export::{self, ChartData};
use crate::source::{LogFile, LogKind};

/// What a batch produced.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Charts of every table with data rows, in file order.
    pub charts: Vec<ChartData>,
    /// Every artifact written.
    pub written: Vec<PathBuf>,
    /// Number of files that could not be processed.
    pub failed: usize,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Analyze and export every file, in order.
pub fn run_batch(
    kind: LogKind,
    files: &[PathBuf],
    settings: &Settings,
    range: &TimeRange,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for path in files {
        let result = match kind {
            LogKind::Top => process_top(path, settings, range, &mut outcome),
            LogKind::Free => process_free(path, settings, range, &mut outcome),
        };
        if let Err(e) = result {
            error!(file = %path.display(), error = %e, "file skipped");
            outcome.failed += 1;
        }
    }
    outcome
}

/// Analyze one `top` log, write its artifacts and collect its charts.
fn process_top(
    path: &Path,
    settings: &Settings,
    range: &TimeRange,
    outcome: &mut BatchOutcome,
) -> Result<()> {
    let log = LogFile::load(path)?;
    let stem = log.stem();
    let tables = analyze_top(&log, settings.threshold, range)?;

    outcome
        .written
        .extend(export::export_top(&settings.output_dir, &stem, &tables)?);
    if settings.with_excel {
        outcome.written.extend(export::export_top_workbooks(
            &settings.output_dir,
            &stem,
            &tables,
            settings.rank_limit,
        )?);
    }

    for (metric, table) in &tables {
        let title = format!("{stem} {}", metric.label());
        match ChartData::top(title, table, settings.rank_limit, settings.tick_count) {
            Some(chart) => outcome.charts.push(chart),
            None => info!(file = %stem, metric = metric.label(), "no data rows, chart skipped"),
        }
    }
    Ok(())
}

/// Analyze one `free` log, write its CSV and collect its chart.
fn process_free(
    path: &Path,
    settings: &Settings,
    range: &TimeRange,
    outcome: &mut BatchOutcome,
) -> Result<()> {
    let log = LogFile::load(path)?;
    let stem = log.stem();
    let report = analyze_free_log(&log, range)?;

    outcome
        .written
        .push(export::export_free(&settings.output_dir, &stem, &report)?);

    match ChartData::memory(stem.as_str(), &report, settings.tick_count) {
        Some(chart) => outcome.charts.push(chart),
        None => info!(file = %stem, "no data rows, chart skipped"),
    }
    Ok(())
}
