//! PowerPoint (.pptx) reader: one document per slide.
//!
//! A .pptx is a zip of DrawingML parts. Slide text lives in `<a:t>` runs
//! grouped by `<a:p>` paragraphs inside `ppt/slides/slideN.xml`; we read those
//! parts in slide-number order and ignore layouts, masters and notes.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const NAME: &str = "PptxReader";

pub struct PptxReader;

impl DocumentParser for PptxReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let file = File::open(path).map_err(|e| ReaderError::io(NAME, e))?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| ReaderError::malformed(NAME, e))?;

        let mut slides: Vec<(u32, String)> = archive
            .file_names()
            .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
            .collect();
        slides.sort_unstable_by_key(|(n, _)| *n);

        let base = stem(path);
        let mut docs = Vec::with_capacity(slides.len());
        for (number, part) in slides {
            let mut xml = String::new();
            archive
                .by_name(&part)
                .map_err(|e| ReaderError::malformed(NAME, e))?
                .read_to_string(&mut xml)
                .map_err(|e| ReaderError::io(NAME, e))?;

            let text = slide_text(&xml).map_err(|e| ReaderError::malformed(NAME, e))?;
            let name = format!("{base}_slide_{number}");
            if text.is_empty() {
                docs.push(Document::without_text(name));
            } else {
                docs.push(Document::new(name, text));
            }
        }

        Ok(docs)
    }
}

/// `ppt/slides/slide12.xml` → `Some(12)`.
fn slide_number(part: &str) -> Option<u32> {
    part.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Paragraph texts of one slide, one per line, blank paragraphs dropped.
/// A soft break (`<a:br>`) inside a paragraph also starts a new line.
fn slide_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"a:t" => in_text = true,
                b"a:br" => current.push('\n'),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"a:br" => current.push('\n'),
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"a:p" => {
                    let line = current.trim();
                    if !line.is_empty() {
                        lines.push(line.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}
