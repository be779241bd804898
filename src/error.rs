//! Error types for log analysis.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop the analysis of one log file.
///
/// Malformed lines are not errors: they are skipped where they are found.
/// Everything here is structural and ends the processing of the affected
/// file, while other files in the same run carry on.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Reading the log or writing an artifact failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file name carries no 8-digit start date.
    #[error("no YYYYMMDD start date in file name {}", .0.display())]
    MissingStartDate(PathBuf),

    /// The 8-digit group in the file name is not a calendar date.
    #[error("invalid start date '{0}' (expected YYYYMMDD)")]
    InvalidStartDate(String),

    /// A line the analysis cannot do without was never found.
    #[error("no '{field}' line found in {}", path.display())]
    MissingSummaryField { field: &'static str, path: PathBuf },

    /// Writing CSV output failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing an Excel workbook failed.
    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl AnalyzeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        AnalyzeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = AnalyzeError> = std::result::Result<T, E>;
