//! Dataset loader: uploaded file bytes -> `RawTable` -> `SalesDataset`.
//!
//! Loading rules:
//! - The format is picked from the file extension only (`csv`, `xlsx`, `xls`).
//! - The whole file is parsed and cleaned before anything is returned, so a
//!   failed upload can never replace a good dataset.
//! - Spreadsheets: the first worksheet is read, first row is the header.

use std::io::Cursor;

use bytes::Bytes;
use calamine::{Data, Reader, Xls, Xlsx};

use crate::dataset::{Cell, RawTable, SalesDataset};
use crate::error::{Result, SalesError};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Resolve the format from a file name (case-insensitive extension).
    pub fn from_filename(filename: &str) -> Result<Self> {
        let lower = filename.trim().to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Ok(FileFormat::Csv)
        } else if lower.ends_with(".xlsx") {
            Ok(FileFormat::Xlsx)
        } else if lower.ends_with(".xls") {
            Ok(FileFormat::Xls)
        } else {
            Err(SalesError::UnsupportedFormat(filename.to_string()))
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
        }
    }
}

/// Parse an uploaded file into a cleaned dataset.
pub fn load_sales_file(filename: &str, data: Bytes) -> Result<SalesDataset> {
    let format = FileFormat::from_filename(filename)?;
    let table = read_table(format, data)?;
    SalesDataset::from_table(table)
}

/// Parse file bytes into a raw table without any cleaning.
pub fn read_table(format: FileFormat, data: Bytes) -> Result<RawTable> {
    match format {
        FileFormat::Csv => read_csv(&data),
        FileFormat::Xlsx => read_workbook::<Xlsx<_>>(data),
        FileFormat::Xls => read_workbook::<Xls<_>>(data),
    }
}

fn read_csv(data: &[u8]) -> Result<RawTable> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let columns = header_names(reader.headers()?.iter().map(Cell::from_text));
    if columns.is_empty() {
        return Err(SalesError::Load("file has no header row".into()));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| SalesError::Load(format!("csv parse error at line {}: {e}", line + 2)))?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable::new(columns, rows))
}

fn read_workbook<W>(data: Bytes) -> Result<RawTable>
where
    W: Reader<Cursor<Bytes>>,
    calamine::Error: From<W::Error>,
{
    let mut workbook = W::new(Cursor::new(data)).map_err(calamine::Error::from)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SalesError::Load("workbook has no worksheets".into()))?
        .map_err(calamine::Error::from)?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| SalesError::Load("file has no header row".into()))?;
    let columns = header_names(header.iter().map(sheet_cell));

    let rows = rows.map(|r| r.iter().map(sheet_cell).collect()).collect();
    Ok(RawTable::new(columns, rows))
}

fn sheet_cell(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::from_text(s),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => Cell::Date(d.date()),
            None => Cell::Number(dt.as_f64()),
        },
    }
}

/// Header names; blank headers get a positional placeholder.
fn header_names(cells: impl Iterator<Item = Cell>) -> Vec<String> {
    cells
        .enumerate()
        .map(|(i, c)| c.as_key().unwrap_or_else(|| format!("Unnamed: {i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(FileFormat::from_filename("sales.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("SALES.XLSX").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_filename("old.xls").unwrap(), FileFormat::Xls);

        let err = FileFormat::from_filename("notes.txt").unwrap_err();
        assert_eq!(err.client_code().as_str(), "UNSUPPORTED_FORMAT");
        assert!(err.is_load_error());
    }

    #[test]
    fn csv_header_and_rows() {
        let raw = "\u{FEFF}Platform, Brand ,Quantity,Price\nA,X,2,10\nB,Y, 1 ,5\n";
        let table = read_table(FileFormat::Csv, Bytes::from(raw)).unwrap();
        assert_eq!(table.columns, vec!["Platform", "Brand", "Quantity", "Price"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][2], Cell::Text("1".into()));
    }

    #[test]
    fn csv_ragged_rows_tolerated() {
        let raw = "Quantity,Price,Brand\n1,2\n3,4,Z,extra\n";
        let ds = load_sales_file("s.csv", Bytes::from(raw)).unwrap();
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.orders()[0].brand, None);
        assert_eq!(ds.orders()[1].brand.as_deref(), Some("Z"));
    }

    #[test]
    fn empty_csv_is_a_load_error() {
        let err = load_sales_file("empty.csv", Bytes::new()).unwrap_err();
        assert_eq!(err.client_code().as_str(), "LOAD_FAILED");
    }

    #[test]
    fn blank_header_gets_placeholder() {
        let table = read_table(FileFormat::Csv, Bytes::from("Quantity,,Price\n1,x,2\n")).unwrap();
        assert_eq!(table.columns, vec!["Quantity", "Unnamed: 1", "Price"]);
    }

    #[test]
    fn spreadsheet_cells_map_to_table_cells() {
        use calamine::{CellErrorType, ExcelDateTime, ExcelDateTimeType};

        assert_eq!(sheet_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(sheet_cell(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(sheet_cell(&Data::String(" 7 ".into())).as_number(), Some(7.0));
        assert_eq!(sheet_cell(&Data::Error(CellErrorType::Div0)), Cell::Empty);

        // 45306 is 2024-01-15 in the 1900 date system
        let date = Data::DateTime(ExcelDateTime::new(45306.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(
            sheet_cell(&date),
            Cell::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn garbage_spreadsheet_is_a_load_error() {
        let err = load_sales_file("broken.xlsx", Bytes::from_static(b"not a zip")).unwrap_err();
        assert_eq!(err.client_code().as_str(), "LOAD_FAILED");
    }

    #[test]
    fn missing_price_column_rejected() {
        let err = load_sales_file("s.csv", Bytes::from("Quantity,Brand\n1,X\n")).unwrap_err();
        assert_eq!(err.client_code().as_str(), "MISSING_COLUMN");
    }
}
