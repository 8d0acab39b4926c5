//! Excel (.xlsx / .xls) reader: one document per worksheet.
//!
//! Compiled only with the `excel` feature.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tracing::warn;

const NAME: &str = "ExcelReader";

/// Non-empty cells of a row are joined with `", "`; empty rows are dropped.
pub struct ExcelReader;

impl DocumentParser for ExcelReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| ReaderError::malformed(NAME, e))?;

        let base = stem(path);
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        let mut docs = Vec::with_capacity(sheet_names.len());

        for sheet in &sheet_names {
            let name = format!("{base}_{sheet}");
            let range = match workbook.worksheet_range(sheet) {
                Ok(range) => range,
                Err(e) => {
                    warn!("Skipping sheet '{}' of {}: {}", sheet, base, e);
                    docs.push(Document::without_text(name));
                    continue;
                }
            };

            let rows: Vec<String> = range
                .rows()
                .map(|row| {
                    row.iter()
                        .map(|cell| cell.to_string())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .filter(|line| !line.is_empty())
                .collect();

            if rows.is_empty() {
                docs.push(Document::without_text(name));
            } else {
                docs.push(Document::new(name, rows.join("\n")));
            }
        }

        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    fn worksheet(rows: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{MAIN_NS}"><sheetData>{rows}</sheetData></worksheet>"#)
    }

    fn text_cell(r: &str, text: &str) -> String {
        format!(r#"<c r="{r}" t="inlineStr"><is><t>{text}</t></is></c>"#)
    }

    fn number_cell(r: &str, value: f64) -> String {
        format!(r#"<c r="{r}"><v>{value}</v></c>"#)
    }

    /// Workbook listing `Income` then `Notes`; parts are stored in the
    /// opposite order so sheet order must come from the workbook.
    fn write_workbook(path: &Path) {
        let income = worksheet(&format!(
            r#"<row r="1">{}{}</row><row r="3">{}{}</row>"#,
            text_cell("A1", "Quarter"),
            text_cell("B1", "Revenue"),
            text_cell("A3", "Q3"),
            number_cell("C3", 120.0),
        ));
        let parts = [
            (
                "[Content_Types].xml",
                r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/worksheets/sheet2.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#.to_string(),
            ),
            (
                "xl/workbook.xml",
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="{MAIN_NS}" xmlns:r="{REL_NS}"><sheets><sheet name="Income" sheetId="1" r:id="rId1"/><sheet name="Notes" sheetId="2" r:id="rId2"/></sheets></workbook>"#),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                format!(r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="{REL_NS}/worksheet" Target="worksheets/sheet2.xml"/><Relationship Id="rId2" Type="{REL_NS}/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#),
            ),
            ("xl/worksheets/sheet1.xml", worksheet("")),
            ("xl/worksheets/sheet2.xml", income),
        ];

        let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
        for (name, body) in parts {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn one_document_per_sheet_in_workbook_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path);

        let docs = ExcelReader.parse(&path).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["book_Income", "book_Notes"]);
        // Row 2 is empty and B3 is missing: neither leaves a trace.
        assert_eq!(docs[0].content.as_deref(), Some("Quarter, Revenue\nQ3, 120"));
        assert_eq!(docs[1].content, None);
    }

    #[test]
    fn non_workbook_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.xlsx");
        std::fs::write(&path, "a,b,c").unwrap();
        assert!(matches!(
            ExcelReader.parse(&path),
            Err(ReaderError::Malformed { .. })
        ));
    }
}
