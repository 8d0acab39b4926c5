//! Plain-text reader.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use std::path::Path;

const NAME: &str = "TextReader";

/// Reads the file as one document. Invalid UTF-8 is replaced, not rejected.
pub struct TextReader;

impl DocumentParser for TextReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let bytes = std::fs::read(path).map_err(|e| ReaderError::io(NAME, e))?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Ok(vec![Document::new(stem(path), text)])
    }
}
