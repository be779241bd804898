//! Log discovery and loading.
//!
//! Logs are plain text files written by a cron job or shell loop around
//! `top -b` or `free`. The monitor names them after their kind and the day
//! they started, e.g. `top_20240101.log`.

mod file;

pub use file::{start_date_from_name, LogFile};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AnalyzeError, Result};

/// The kind of monitor output a log holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Repeated `top -b` process tables.
    Top,
    /// Repeated `free` memory summaries with a timestamp prefix.
    Free,
}

impl LogKind {
    /// File name prefix used by the monitor for this kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            LogKind::Top => "top_",
            LogKind::Free => "free_",
        }
    }

    /// Check whether a file name looks like a log of this kind.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name.starts_with(self.prefix()) && file_name.ends_with(".log")
    }
}

/// List the logs of one kind in a directory, sorted by path.
///
/// The directory is not searched recursively.
pub fn discover(dir: &Path, kind: LogKind) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| AnalyzeError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AnalyzeError::io(dir, e))?;
        let path = entry.path();
        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| kind.matches(name));
        if matched && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    debug!(dir = %dir.display(), ?kind, found = paths.len(), "discovered logs");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_kind_matches() {
        assert!(LogKind::Top.matches("top_20240101.log"));
        assert!(!LogKind::Top.matches("top_20240101.txt"));
        assert!(!LogKind::Top.matches("free_20240101.log"));
        assert!(LogKind::Free.matches("free_20240101.log"));
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["top_20240102.log", "top_20240101.log", "free_20240101.log", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let found = discover(dir.path(), LogKind::Top).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["top_20240101.log", "top_20240102.log"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let err = discover(Path::new("/nonexistent/toplog/input"), LogKind::Free).unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }
}
