//! Table Parser Module
//! Turns uploaded file bytes into a Polars DataFrame based on the file extension.

use calamine::{Data, Reader, Xlsx};
use polars::prelude::*;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Error reading file {file}: {message}")]
    ParseFailure { file: String, message: String },
}

/// Parses uploaded CSV/XLSX bytes into DataFrames.
pub struct TableParser;

impl TableParser {
    /// Parse raw file bytes. The format is chosen from the file name's
    /// extension (case-insensitive). Unrecognized extensions fail without
    /// touching the bytes.
    pub fn parse(file_name: &str, bytes: &[u8]) -> Result<DataFrame, ParseError> {
        match Self::file_extension(file_name).as_str() {
            ".csv" => Self::parse_csv(file_name, bytes),
            ".xlsx" => Self::parse_xlsx(file_name, bytes),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Trailing dot-extension of a file name, lowercased. Empty string if the
    /// name has no dot.
    pub fn file_extension(file_name: &str) -> String {
        match file_name.rfind('.') {
            Some(idx) => file_name[idx..].to_ascii_lowercase(),
            None => String::new(),
        }
    }

    fn parse_csv(file_name: &str, bytes: &[u8]) -> Result<DataFrame, ParseError> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
            .map_err(|e| ParseError::ParseFailure {
                file: file_name.to_string(),
                message: e.to_string(),
            })
    }

    /// Decode the first sheet of an XLSX workbook. The header row defines
    /// column names; each column is typed numeric, boolean, or text depending
    /// on what its non-empty cells hold.
    fn parse_xlsx(file_name: &str, bytes: &[u8]) -> Result<DataFrame, ParseError> {
        let fail = |message: String| ParseError::ParseFailure {
            file: file_name.to_string(),
            message,
        };

        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| fail(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| fail("workbook has no sheets".to_string()))?
            .map_err(|e| fail(e.to_string()))?;

        let mut rows = range.rows();
        let header = rows
            .next()
            .ok_or_else(|| fail("sheet is empty".to_string()))?;

        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let name = Self::cell_to_string(cell).unwrap_or_default();
                if name.is_empty() {
                    format!("column_{}", i + 1)
                } else {
                    name
                }
            })
            .collect();

        let data_rows: Vec<&[Data]> = rows.collect();
        let columns: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(j, name)| Self::build_column(name, j, &data_rows))
            .collect();

        DataFrame::new(columns).map_err(|e| fail(e.to_string()))
    }

    /// Build one typed column from cell index `j` of every data row.
    fn build_column(name: &str, j: usize, rows: &[&[Data]]) -> Column {
        let cells: Vec<&Data> = rows
            .iter()
            .map(|row| row.get(j).unwrap_or(&Data::Empty))
            .collect();

        let present: Vec<&&Data> = cells.iter().filter(|c| !Self::cell_is_empty(c)).collect();

        if !present.is_empty() && present.iter().all(|c| Self::cell_to_f64(c).is_some()) {
            let values: Vec<Option<f64>> = cells.iter().map(|c| Self::cell_to_f64(c)).collect();
            return Column::new(name.into(), values);
        }

        if !present.is_empty() && present.iter().all(|c| matches!(c, Data::Bool(_))) {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|c| match c {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            return Column::new(name.into(), values);
        }

        let values: Vec<Option<String>> = cells.iter().map(|c| Self::cell_to_string(c)).collect();
        Column::new(name.into(), values)
    }

    fn cell_is_empty(cell: &Data) -> bool {
        match cell {
            Data::Empty => true,
            Data::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn cell_to_f64(cell: &Data) -> Option<f64> {
        match cell {
            Data::Float(f) => Some(*f),
            Data::Int(i) => Some(*i as f64),
            Data::DateTime(dt) => Some(dt.as_f64()),
            Data::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn cell_to_string(cell: &Data) -> Option<String> {
        match cell {
            Data::Empty => None,
            // Blank text cells count as missing, same as truly empty cells.
            Data::String(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.to_string())
                }
            }
            Data::Float(f) => Some(f.to_string()),
            Data::Int(i) => Some(i.to_string()),
            Data::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_with_header_and_numeric_inference() {
        let df = TableParser::parse("data.csv", b"a,b\n1,x\n2,y\n3,z\n").unwrap();
        assert_eq!(df.height(), 3);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(matches!(
            df.column("a").unwrap().dtype(),
            DataType::Int64 | DataType::Float64
        ));
        assert_eq!(df.column("b").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn unrecognized_extension_is_rejected() {
        let err = TableParser::parse("report.xyz", b"whatever").unwrap_err();
        match err {
            ParseError::UnsupportedFormat(ext) => assert_eq!(ext, ".xyz"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn xlsx_columns_are_typed_and_blank_headers_named() {
        use crate::convert::XlsxWriter;

        // A blank header cell, a numeric-looking text column, a native float
        // column, a boolean column, and a text column with an empty cell.
        let df = df!(
            "" => ["1.5", "2.5"],
            "n" => [1.0f64, 2.0],
            "flag" => [true, false],
            "label" => ["x", ""]
        )
        .unwrap();
        let bytes = XlsxWriter::write_workbook(&df).unwrap();

        let parsed = TableParser::parse("t.xlsx", &bytes).unwrap();
        let names: Vec<String> = parsed
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, vec!["column_1", "n", "flag", "label"]);
        assert_eq!(parsed.height(), 2);

        // Every non-empty cell parses as a number -> numeric column.
        assert_eq!(parsed.column("column_1").unwrap().dtype(), &DataType::Float64);
        assert_eq!(parsed.column("n").unwrap().dtype(), &DataType::Float64);
        assert_eq!(parsed.column("flag").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(parsed.column("label").unwrap().dtype(), &DataType::String);

        // Empty text cells come back as missing, not as empty strings.
        assert_eq!(parsed.column("label").unwrap().null_count(), 1);
        let n = parsed.column("column_1").unwrap().f64().unwrap();
        assert_eq!(n.get(0), Some(1.5));
    }

    #[test]
    fn corrupt_xlsx_reports_the_file_name() {
        let err = TableParser::parse("broken.xlsx", b"not a zip archive").unwrap_err();
        match err {
            ParseError::ParseFailure { file, .. } => assert_eq!(file, "broken.xlsx"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(TableParser::file_extension("Data.CSV"), ".csv");
        assert_eq!(TableParser::file_extension("noext"), "");
    }
}
