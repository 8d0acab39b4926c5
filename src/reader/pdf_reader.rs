//! PDF text extraction, one [`Document`] per page.
//!
//! lopdf decodes the content streams and maps glyphs back through each font's
//! encoding. Image-only pages come back empty or fail to decode; either way
//! they become payload-less documents so page numbering stays intact.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use lopdf::Document as LopdfDocument;
use std::path::Path;
use tracing::debug;

const NAME: &str = "PdfReader";

/// Page-by-page PDF reader backed by lopdf.
pub struct PdfReader;

impl DocumentParser for PdfReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let doc = LopdfDocument::load(path).map_err(|e| ReaderError::malformed(NAME, e))?;
        let base = stem(path);
        let pages = doc.get_pages();
        let mut docs = Vec::with_capacity(pages.len());

        for &page_num in pages.keys() {
            let name = format!("{base}_{page_num}");
            match doc.extract_text(&[page_num]) {
                Ok(text) if !text.trim().is_empty() => docs.push(Document::new(name, text)),
                Ok(_) => docs.push(Document::without_text(name)),
                Err(e) => {
                    debug!("Page {} of {} has no extractable text: {}", page_num, base, e);
                    docs.push(Document::without_text(name));
                }
            }
        }

        Ok(docs)
    }
}
