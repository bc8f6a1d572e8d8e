//! Table Serializer Module
//! Encodes a table to CSV, XLSX, or JSON Lines bytes with the matching MIME
//! type and output filename.

use polars::prelude::*;
use serde_json::{Map, Value};
use std::io::Write;
use thiserror::Error;

use super::xlsx::XlsxWriter;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Zip error: {0}")]
    ZipError(#[from] ::zip::result::ZipError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Conversion target selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Csv,
    Excel,
    Json,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 3] = [TargetFormat::Csv, TargetFormat::Excel, TargetFormat::Json];

    pub fn label(&self) -> &'static str {
        match self {
            TargetFormat::Csv => "CSV",
            TargetFormat::Excel => "Excel",
            TargetFormat::Json => "JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Csv => ".csv",
            TargetFormat::Excel => ".xlsx",
            TargetFormat::Json => ".json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Csv => "text/csv",
            TargetFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            TargetFormat::Json => "application/json",
        }
    }
}

impl Default for TargetFormat {
    fn default() -> Self {
        TargetFormat::Csv
    }
}

/// Encoded output ready for download.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: &'static str,
}

/// Encodes tables for download. Results are regenerated on every request from
/// the current table state, never cached.
pub struct TableSerializer;

impl TableSerializer {
    pub fn serialize(
        df: &DataFrame,
        target: TargetFormat,
        original_name: &str,
    ) -> Result<ConversionResult, ConvertError> {
        let bytes = match target {
            TargetFormat::Csv => Self::to_csv(df)?,
            TargetFormat::Excel => XlsxWriter::write_workbook(df)?,
            TargetFormat::Json => Self::to_json_lines(df)?,
        };

        Ok(ConversionResult {
            bytes,
            file_name: Self::replace_extension(original_name, target.extension()),
            mime_type: target.mime_type(),
        })
    }

    /// Comma-delimited encoding with a header row and no index column.
    fn to_csv(df: &DataFrame) -> Result<Vec<u8>, ConvertError> {
        let mut buf = Vec::new();
        let mut df = df.clone();
        CsvWriter::new(&mut buf)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buf)
    }

    /// One JSON object per row, newline-delimited.
    fn to_json_lines(df: &DataFrame) -> Result<Vec<u8>, ConvertError> {
        let mut buf = Vec::new();
        let columns = df.get_columns();

        for i in 0..df.height() {
            let mut row = Map::new();
            for column in columns {
                let value = column.get(i)?;
                row.insert(column.name().to_string(), Self::any_to_json(&value));
            }
            serde_json::to_writer(&mut buf, &Value::Object(row))?;
            buf.write_all(b"\n")?;
        }

        Ok(buf)
    }

    fn any_to_json(value: &AnyValue) -> Value {
        match value {
            AnyValue::Null => Value::Null,
            AnyValue::Boolean(b) => Value::Bool(*b),
            AnyValue::String(s) => Value::String(s.to_string()),
            AnyValue::StringOwned(s) => Value::String(s.to_string()),
            AnyValue::Int8(v) => Value::from(*v),
            AnyValue::Int16(v) => Value::from(*v),
            AnyValue::Int32(v) => Value::from(*v),
            AnyValue::Int64(v) => Value::from(*v),
            AnyValue::UInt8(v) => Value::from(*v),
            AnyValue::UInt16(v) => Value::from(*v),
            AnyValue::UInt32(v) => Value::from(*v),
            AnyValue::UInt64(v) => Value::from(*v),
            AnyValue::Float32(f) => serde_json::Number::from_f64(*f as f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            AnyValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            other => Value::String(other.to_string().trim_matches('"').to_string()),
        }
    }

    /// Swap the final dot-extension of `name` for `extension`. Names without
    /// a dot get the extension appended. No substring matching: a name like
    /// `csv_export.csv` only has its trailing `.csv` replaced.
    fn replace_extension(name: &str, extension: &str) -> String {
        match name.rfind('.') {
            Some(idx) => format!("{}{}", &name[..idx], extension),
            None => format!("{}{}", name, extension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TableParser;

    #[test]
    fn excel_conversion_derives_filename_and_mime() {
        let df = df!("a" => [1i64]).unwrap();
        let result = TableSerializer::serialize(&df, TargetFormat::Excel, "data.csv").unwrap();
        assert_eq!(result.file_name, "data.xlsx");
        assert_eq!(
            result.mime_type,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(!result.bytes.is_empty());
    }

    #[test]
    fn only_the_trailing_extension_is_replaced() {
        assert_eq!(
            TableSerializer::replace_extension("csv_export.csv", ".json"),
            "csv_export.json"
        );
        assert_eq!(
            TableSerializer::replace_extension("archive.tar.gz", ".csv"),
            "archive.tar.csv"
        );
        assert_eq!(
            TableSerializer::replace_extension("noext", ".csv"),
            "noext.csv"
        );
    }

    #[test]
    fn csv_round_trips_through_the_parser() {
        let df = df!(
            "a" => [1i64, 2, 3],
            "b" => ["x", "y", "z"]
        )
        .unwrap();
        let result = TableSerializer::serialize(&df, TargetFormat::Csv, "t.csv").unwrap();
        let parsed = TableParser::parse(&result.file_name, &result.bytes).unwrap();
        assert!(parsed.equals(&df));
    }

    #[test]
    fn json_output_is_newline_delimited_objects() {
        let df = df!(
            "a" => [1i64, 2],
            "b" => [Some("x"), None]
        )
        .unwrap();
        let result = TableSerializer::serialize(&df, TargetFormat::Json, "t.csv").unwrap();
        assert_eq!(result.file_name, "t.json");
        assert_eq!(result.mime_type, "application/json");

        let text = String::from_utf8(result.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["a"], Value::from(1i64));
        assert_eq!(first["b"], Value::from("x"));
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["b"], Value::Null);
    }

    #[test]
    fn csv_header_row_is_included() {
        let df = df!("a" => [1i64], "b" => [2i64]).unwrap();
        let result = TableSerializer::serialize(&df, TargetFormat::Csv, "t.xlsx").unwrap();
        let text = String::from_utf8(result.bytes).unwrap();
        assert!(text.starts_with("a,b\n"));
        assert_eq!(result.file_name, "t.csv");
    }
}
