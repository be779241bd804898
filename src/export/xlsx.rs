//! Excel workbook output for ranked `top` tables.
//!
//! The workbook holds one `result` sheet with the same cells as the CSV,
//! plus a line chart of the highest ranked columns below the data.

use std::path::Path;

use rust_xlsxwriter::{Chart, ChartType, ColNum, RowNum, Workbook, Worksheet, XlsxError};

use super::chart::RATE_AXIS;
use crate::data::RankedTable;
use crate::error::Result;

/// Name of the worksheet holding the table.
pub const SHEET_NAME: &str = "result";

const CHART_TITLE: &str = "Use rate per process";
const CHART_WIDTH: u32 = 907;
const CHART_HEIGHT: u32 = 605;
/// Blank rows between the last table row and the chart.
const CHART_GAP: RowNum = 2;

/// Write a table to a workbook at `path`, replacing any existing file.
///
/// Cells follow the ranked column order. Numeric cells are stored as
/// numbers, empty cells are left blank. Tables with data rows also get a
/// 0 to 100 line chart of their `limit` highest ranked columns.
/// Tables without data rows or columns get the cells only.
pub fn write_workbook(table: &RankedTable, limit: usize, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let last_row = write_cells(sheet, table)?;
    if let Some(chart) = line_chart(table, limit)? {
        sheet.insert_chart(last_row + CHART_GAP, 0, &chart)?;
    }

    workbook.save(path)?;
    Ok(())
}

/// Write header and grid, returning the index of the last row written.
fn write_cells(sheet: &mut Worksheet, table: &RankedTable) -> Result<RowNum, XlsxError> {
    for (column, label) in table.header().iter().enumerate() {
        sheet.write_string(0, col_num(column)?, label)?;
    }

    let mut row: RowNum = 0;
    for line in table.grid() {
        row += 1;
        for (column, cell) in line.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let column = col_num(column)?;
            match cell.parse::<f64>() {
                Ok(value) if column > 0 => sheet.write_number(row, column, value)?,
                _ => sheet.write_string(row, column, cell)?,
            };
        }
    }
    Ok(row)
}

fn line_chart(table: &RankedTable, limit: usize) -> Result<Option<Chart>, XlsxError> {
    let rows = table.table().row_count();
    let ranked = table.top(limit).len();
    if rows == 0 || ranked < 2 {
        return Ok(None);
    }
    let last = RowNum::try_from(rows).map_err(|_| XlsxError::RowColumnLimitError)?;

    let mut chart = Chart::new(ChartType::Line);
    chart.title().set_name(CHART_TITLE);
    chart.x_axis().set_name("Time");
    chart.y_axis().set_name(RATE_AXIS).set_min(0.0).set_max(100.0);
    chart.set_width(CHART_WIDTH).set_height(CHART_HEIGHT);

    // The sheet is already in ranked order, so the top columns come first.
    for position in 1..ranked {
        let column = col_num(position)?;
        chart
            .add_series()
            .set_name((SHEET_NAME, 0, column))
            .set_categories((SHEET_NAME, 1, 0, last, 0))
            .set_values((SHEET_NAME, 1, column, last, column));
    }
    Ok(Some(chart))
}

fn col_num(column: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(column).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;
    use toplog_types::{MetricTable, Row, Sample, SummaryKind};

    fn ranked() -> RankedTable {
        let at = |minute| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, minute, 0).unwrap();
        let table = MetricTable::from_parts(
            "cpu",
            vec!["1(a)".into(), "2(b)".into(), "3(c)".into()],
            vec![
                Row::new(at(0), vec![Sample::parse("1.5"), None, Sample::parse("3.0")]),
                Row::new(at(1), vec![Sample::parse("2.0"), Sample::parse("8.0"), None]),
            ],
        );
        RankedTable::rank(table, &[SummaryKind::Max])
    }

    #[test]
    fn test_write_workbook() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("top_20240101_cpu_result.xlsx");
        write_workbook(&ranked(), 2, &path).unwrap();

        // xlsx files are zip archives.
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_write_workbook_without_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let table = RankedTable::rank(MetricTable::new("memory"), &[SummaryKind::Max]);

        write_workbook(&table, 5, &path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_write_workbook_into_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xlsx");
        assert!(write_workbook(&ranked(), 5, &path).is_err());
    }
}
