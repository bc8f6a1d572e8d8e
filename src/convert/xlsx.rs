//! XLSX Workbook Writer Module
//! Writes a single-sheet workbook with direct ZIP/XML generation, the same
//! approach used for other Office Open XML packages: each part is emitted as
//! a string into a ZIP archive.

use polars::prelude::*;
use std::io::{Cursor, Write};
use ::zip::write::FileOptions;
use ::zip::ZipWriter;

use super::serializer::ConvertError;

/// Builds XLSX workbooks in memory.
pub struct XlsxWriter;

impl XlsxWriter {
    /// Encode the frame as a single-sheet workbook: header row first, then one
    /// row per data row, no index column.
    pub fn write_workbook(df: &DataFrame) -> Result<Vec<u8>, ConvertError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(Self::content_types_xml().as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(Self::rels_xml().as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(Self::workbook_xml().as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(Self::workbook_rels_xml().as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(Self::styles_xml().as_bytes())?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        zip.write_all(Self::sheet_xml(df)?.as_bytes())?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    fn content_types_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
</Types>"#
    }

    fn rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
    }

    fn workbook_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
    }

    fn workbook_rels_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#
    }

    fn styles_xml() -> &'static str {
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="1"><fill><patternFill patternType="none"/></fill></fills>
<borders count="1"><border/></borders>
<cellStyleXfs count="1"><xf/></cellStyleXfs>
<cellXfs count="1"><xf/></cellXfs>
</styleSheet>"#
    }

    fn sheet_xml(df: &DataFrame) -> Result<String, ConvertError> {
        let mut rows_xml = String::new();

        // Row 1: header.
        rows_xml.push_str(r#"<row r="1">"#);
        for (j, name) in df.get_column_names().iter().enumerate() {
            rows_xml.push_str(&Self::inline_string_cell(j, 1, name));
        }
        rows_xml.push_str("</row>");

        let columns = df.get_columns();
        for i in 0..df.height() {
            let row_num = i + 2;
            rows_xml.push_str(&format!(r#"<row r="{}">"#, row_num));
            for (j, column) in columns.iter().enumerate() {
                let value = column.get(i).map_err(ConvertError::PolarsError)?;
                rows_xml.push_str(&Self::value_cell(j, row_num, &value));
            }
            rows_xml.push_str("</row>");
        }

        Ok(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{}</sheetData>
</worksheet>"#,
            rows_xml
        ))
    }

    fn value_cell(col: usize, row: usize, value: &AnyValue) -> String {
        match value {
            AnyValue::Null => String::new(),
            AnyValue::Boolean(b) => format!(
                r#"<c r="{}{}" t="b"><v>{}</v></c>"#,
                Self::column_letters(col),
                row,
                if *b { 1 } else { 0 }
            ),
            v => match Self::any_to_f64(v) {
                Some(n) if n.is_finite() => format!(
                    r#"<c r="{}{}"><v>{}</v></c>"#,
                    Self::column_letters(col),
                    row,
                    n
                ),
                _ => {
                    let text = v.to_string();
                    Self::inline_string_cell(col, row, text.trim_matches('"'))
                }
            },
        }
    }

    fn any_to_f64(value: &AnyValue) -> Option<f64> {
        match value {
            AnyValue::Float64(f) => Some(*f),
            AnyValue::Float32(f) => Some(*f as f64),
            AnyValue::Int8(v) => Some(*v as f64),
            AnyValue::Int16(v) => Some(*v as f64),
            AnyValue::Int32(v) => Some(*v as f64),
            AnyValue::Int64(v) => Some(*v as f64),
            AnyValue::UInt8(v) => Some(*v as f64),
            AnyValue::UInt16(v) => Some(*v as f64),
            AnyValue::UInt32(v) => Some(*v as f64),
            AnyValue::UInt64(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn inline_string_cell(col: usize, row: usize, text: &str) -> String {
        format!(
            r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
            Self::column_letters(col),
            row,
            Self::xml_escape(text)
        )
    }

    /// Spreadsheet column letters for a zero-based index: A, B, ..., Z, AA, ...
    fn column_letters(mut col: usize) -> String {
        let mut letters = String::new();
        loop {
            letters.insert(0, (b'A' + (col % 26) as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        letters
    }

    fn xml_escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    #[test]
    fn column_letters_roll_over_at_z() {
        assert_eq!(XlsxWriter::column_letters(0), "A");
        assert_eq!(XlsxWriter::column_letters(25), "Z");
        assert_eq!(XlsxWriter::column_letters(26), "AA");
        assert_eq!(XlsxWriter::column_letters(27), "AB");
    }

    #[test]
    fn workbook_round_trips_through_calamine() {
        let df = df!(
            "n" => [1.5f64, 2.0],
            "label" => ["a & b", "c<d>"]
        )
        .unwrap();
        let bytes = XlsxWriter::write_workbook(&df).unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<_> = range.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0].to_string(), "n");
        assert_eq!(rows[0][1].to_string(), "label");
        assert_eq!(rows[1][0].to_string(), "1.5");
        assert_eq!(rows[1][1].to_string(), "a & b");
        assert_eq!(rows[2][1].to_string(), "c<d>");
    }

    #[test]
    fn null_cells_are_omitted() {
        let df = df!("v" => [Some(1.0f64), None]).unwrap();
        let xml = XlsxWriter::sheet_xml(&df).unwrap();
        assert!(xml.contains(r#"<row r="3"></row>"#));
    }
}
