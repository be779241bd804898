//! CSV output for ranked tables.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::data::RankedTable;
use crate::error::{AnalyzeError, Result};

/// Write the header and every data and summary row in ranked column order.
///
/// Missing cells become empty fields.
pub fn write_table<W: Write>(table: &RankedTable, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(table.header())?;
    for line in table.grid() {
        writer.write_record(&line)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write a table to `path`, replacing any existing file.
pub fn write_table_file(table: &RankedTable, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| AnalyzeError::io(path, e))?;
    write_table(table, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;
    use toplog_types::{MetricTable, Row, Sample, SummaryKind};

    fn ranked() -> RankedTable {
        let at = |minute| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, minute, 0).unwrap();
        let table = MetricTable::from_parts(
            "cpu",
            vec!["1(a)".into(), "2(b)".into()],
            vec![
                Row::new(at(0), vec![Sample::parse("1.5"), None]),
                Row::new(at(1), vec![Sample::parse("2.0"), Sample::parse("8.0")]),
            ],
        );
        RankedTable::rank(table, &[SummaryKind::Max])
    }

    #[test]
    fn test_write_ranked_csv() {
        let mut out = Vec::new();
        write_table(&ranked(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            ",2(b),1(a)\n\
             2024-01-01 09:00:00,,1.5\n\
             2024-01-01 09:01:00,8.0,2.0\n\
             MAX:,8.0,2.0\n"
        );
    }

    #[test]
    fn test_write_table_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("top_cpu_result.csv");
        write_table_file(&ranked(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert!(written.starts_with(",2(b),1(a)\n"));
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_table_file(&ranked(), &path).unwrap_err();
        assert!(matches!(err, AnalyzeError::Io { .. }));
    }
}
