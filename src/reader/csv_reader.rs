//! CSV reader: the whole file becomes one document, one line per record.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use std::path::Path;

const NAME: &str = "CsvReader";

/// Flattens every record to `field, field, …`.
///
/// Headers are not treated specially; the header row is simply the first
/// line of the payload. Ragged rows are accepted.
pub struct CsvReader;

impl DocumentParser for CsvReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| ReaderError::io(NAME, e))?;

        let mut lines = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| ReaderError::malformed(NAME, e))?;
            lines.push(record.iter().collect::<Vec<_>>().join(", "));
        }

        Ok(vec![Document::new(stem(path), lines.join("\n"))])
    }
}
