//! CSV and spreadsheet access.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::{ResolveError, ResolveResult};

/// Which cells to sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Header-row lookup; data rows below the header are summed.
    Named(String),
    /// Zero-based positional column, summed over every row.
    Index(usize),
    /// Every cell in every row.
    All,
}

fn numeric(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

fn csv_error(err: csv::Error) -> ResolveError {
    if matches!(err.kind(), csv::ErrorKind::Io(_)) {
        ResolveError::Execution(format!("cannot read csv: {}", err))
    } else {
        ResolveError::Format(format!("malformed csv: {}", err))
    }
}

/// Value of `column` in the first data row of a headed CSV file.
pub fn csv_lookup(path: &Path, column: &str) -> ResolveResult<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let headers = reader.headers().map_err(csv_error)?.clone();
    let index = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| ResolveError::Format(format!("csv has no column '{}'", column)))?;

    let first = reader
        .records()
        .next()
        .ok_or_else(|| ResolveError::Format("csv has no data rows".to_string()))?
        .map_err(csv_error)?;

    Ok(first.get(index).unwrap_or("").trim().to_string())
}

/// Sum the numeric cells of a CSV file. Cells that do not parse as numbers
/// are skipped rather than failing the sum.
pub fn csv_sum(path: &Path, column: &Column) -> ResolveResult<f64> {
    let has_headers = matches!(column, Column::Named(_));
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let index = match column {
        Column::Named(name) => {
            let headers = reader.headers().map_err(csv_error)?;
            Some(
                headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name))
                    .ok_or_else(|| {
                        ResolveError::Format(format!("csv has no column '{}'", name))
                    })?,
            )
        }
        Column::Index(i) => Some(*i),
        Column::All => None,
    };

    let mut total = 0.0;
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        match index {
            Some(i) => {
                if let Some(value) = record.get(i).and_then(numeric) {
                    total += value;
                }
            }
            None => {
                total += record.iter().filter_map(numeric).sum::<f64>();
            }
        }
    }
    Ok(total)
}

fn cell_value(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => numeric(s),
        _ => None,
    }
}

fn sum_sheet_range(range: &Range<Data>, column: &Column) -> ResolveResult<f64> {
    match column {
        Column::Named(name) => {
            let mut rows = range.rows();
            let headers = rows
                .next()
                .ok_or_else(|| ResolveError::Format("sheet has no rows".to_string()))?;
            let index = headers
                .iter()
                .position(|cell| match cell {
                    Data::String(s) => s.trim().eq_ignore_ascii_case(name),
                    _ => false,
                })
                .ok_or_else(|| {
                    ResolveError::Format(format!("sheet has no column '{}'", name))
                })?;
            Ok(rows
                .filter_map(|row| row.get(index).and_then(cell_value))
                .sum())
        }
        Column::Index(i) => Ok(range
            .rows()
            .filter_map(|row| row.get(*i).and_then(cell_value))
            .sum()),
        Column::All => Ok(range.rows().flatten().filter_map(cell_value).sum()),
    }
}

/// Sum the numeric cells of the first worksheet in an Excel workbook.
pub fn sheet_sum(path: &Path, column: &Column) -> ResolveResult<f64> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| ResolveError::Format(format!("not a valid spreadsheet: {}", err)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ResolveError::Format("workbook has no sheets".to_string()))?
        .map_err(|err| ResolveError::Format(format!("cannot read sheet: {}", err)))?;
    sum_sheet_range(&range, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn lookup_returns_first_data_row() {
        let (_dir, path) = write_csv("id,answer\n1,42\n2,99\n");
        assert_eq!(csv_lookup(&path, "answer").unwrap(), "42");
    }

    #[test]
    fn lookup_matches_headers_case_insensitively() {
        let (_dir, path) = write_csv("ID,Answer\n7,ok\n");
        assert_eq!(csv_lookup(&path, "answer").unwrap(), "ok");
    }

    #[test]
    fn lookup_without_column_is_a_format_error() {
        let (_dir, path) = write_csv("id,value\n1,2\n");
        let err = csv_lookup(&path, "answer").unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }

    #[test]
    fn lookup_without_rows_is_a_format_error() {
        let (_dir, path) = write_csv("id,answer\n");
        let err = csv_lookup(&path, "answer").unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }

    #[test]
    fn sum_skips_non_numeric_cells() {
        let (_dir, path) = write_csv("10\nx\n20\n");
        assert_eq!(csv_sum(&path, &Column::All).unwrap(), 30.0);
    }

    #[test]
    fn sum_by_header_skips_the_header_row() {
        let (_dir, path) = write_csv("name,amount\na,1.5\nb,2.5\nc,skip\n");
        assert_eq!(csv_sum(&path, &Column::Named("amount".into())).unwrap(), 4.0);
    }

    #[test]
    fn sum_by_index_is_positional() {
        let (_dir, path) = write_csv("1,100\n2,200\n");
        assert_eq!(csv_sum(&path, &Column::Index(1)).unwrap(), 300.0);
    }

    #[test]
    fn sheet_sum_is_positional_without_a_name() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 0));
        range.set_value((0, 0), Data::Float(10.0));
        range.set_value((1, 0), Data::String("x".into()));
        range.set_value((2, 0), Data::Float(20.0));
        assert_eq!(sum_sheet_range(&range, &Column::All).unwrap(), 30.0);
        assert_eq!(sum_sheet_range(&range, &Column::Index(0)).unwrap(), 30.0);
    }

    #[test]
    fn sheet_sum_by_name_uses_the_header_row() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("label".into()));
        range.set_value((0, 1), Data::String("Value".into()));
        range.set_value((1, 0), Data::String("a".into()));
        range.set_value((1, 1), Data::Int(4));
        range.set_value((2, 0), Data::String("b".into()));
        range.set_value((2, 1), Data::String("6".into()));
        assert_eq!(
            sum_sheet_range(&range, &Column::Named("value".into())).unwrap(),
            10.0
        );
    }

    #[test]
    fn sheet_sum_unknown_header_is_a_format_error() {
        let mut range: Range<Data> = Range::new((0, 0), (0, 0));
        range.set_value((0, 0), Data::String("other".into()));
        let err = sum_sheet_range(&range, &Column::Named("value".into())).unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }

    #[test]
    fn junk_workbook_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.xlsx");
        std::fs::write(&path, b"definitely not a workbook").unwrap();
        let err = sheet_sum(&path, &Column::All).unwrap_err();
        assert!(matches!(err, ResolveError::Format(_)), "{err}");
    }
}
