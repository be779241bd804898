//! File-based log loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{AnalyzeError, Result};

/// First run of eight digits in a file name, read as `YYYYMMDD`.
static DATE_IN_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{8}").expect("date pattern is valid"));

/// A log file read fully into memory.
///
/// Invalid UTF-8 is replaced rather than rejected and a leading byte order
/// mark is dropped, since both show up in logs copied off Windows shares.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl LogFile {
    /// Read a log from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|e| AnalyzeError::io(&path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        let text = content.strip_prefix('\u{feff}').unwrap_or(&*content);
        Ok(Self::from_lines(path, text.lines()))
    }

    /// Build a log from lines already in memory.
    pub fn from_lines<P, I, S>(path: P, lines: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Path the log was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All lines, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// File name without extension, used to name output artifacts.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "log".to_string())
    }

    /// Calendar date the log started on, taken from its file name.
    pub fn start_date(&self) -> Result<NaiveDate> {
        let name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        match start_date_from_name(&name) {
            Err(AnalyzeError::MissingStartDate(_)) => {
                Err(AnalyzeError::MissingStartDate(self.path.clone()))
            }
            other => other,
        }
    }
}

/// Extract the `YYYYMMDD` start date embedded in a log file name.
pub fn start_date_from_name(name: &str) -> Result<NaiveDate> {
    let digits = DATE_IN_NAME
        .find(name)
        .ok_or_else(|| AnalyzeError::MissingStartDate(PathBuf::from(name)))?
        .as_str();
    NaiveDate::parse_from_str(digits, "%Y%m%d")
        .map_err(|_| AnalyzeError::InvalidStartDate(digits.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_start_date_from_name() {
        let date = start_date_from_name("top_20240101.log").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_start_date_missing() {
        let err = start_date_from_name("top_latest.log").unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingStartDate(_)));
    }

    #[test]
    fn test_start_date_not_a_date() {
        let err = start_date_from_name("top_20241399.log").unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidStartDate(ref d) if d == "20241399"));
    }

    #[test]
    fn test_load_strips_bom() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\xef\xbb\xbffirst\nsecond\n").unwrap();

        let log = LogFile::load(file.path()).unwrap();

        assert_eq!(log.lines(), ["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LogFile::load("/nonexistent/top_20240101.log").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/top_20240101.log"));
    }

    #[test]
    fn test_stem_and_start_date() {
        let log = LogFile::from_lines("input/top_20240315.log", ["top - 10:00:00"]);
        assert_eq!(log.stem(), "top_20240315");
        assert_eq!(log.start_date().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }
}
