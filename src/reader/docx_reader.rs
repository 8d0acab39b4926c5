//! Word (.docx) reader built on docx-rs.

use super::{stem, Document, DocumentParser};
use crate::error::ReaderError;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, Run, RunChild, TableCellContent, TableChild,
    TableRowChild,
};
use std::path::Path;

const NAME: &str = "DocxReader";

/// Body paragraphs become lines; table rows become `cell | cell | …` lines.
pub struct DocxReader;

impl DocumentParser for DocxReader {
    fn name(&self) -> &'static str {
        NAME
    }

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
        let bytes = std::fs::read(path).map_err(|e| ReaderError::io(NAME, e))?;
        let docx = docx_rs::read_docx(&bytes).map_err(|e| ReaderError::malformed(NAME, e))?;

        let mut lines: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(para) => lines.push(paragraph_text(para)),
                DocumentChild::Table(table) => {
                    for row in &table.rows {
                        let TableChild::TableRow(tr) = row;
                        let cells: Vec<String> = tr
                            .cells
                            .iter()
                            .map(|cell| {
                                let TableRowChild::TableCell(tc) = cell;
                                tc.children
                                    .iter()
                                    .filter_map(|c| match c {
                                        TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                        _ => None,
                                    })
                                    .collect::<Vec<_>>()
                                    .join(" ")
                            })
                            .collect();
                        lines.push(cells.join(" | "));
                    }
                }
                _ => {}
            }
        }

        Ok(vec![Document::new(stem(path), lines.join("\n"))])
    }
}

fn paragraph_text(para: &Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        match child {
            ParagraphChild::Run(run) => push_run(run, &mut out),
            ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let ParagraphChild::Run(run) = inner {
                        push_run(run, &mut out);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn push_run(run: &Run, out: &mut String) {
    for child in &run.children {
        if let RunChild::Text(text) = child {
            out.push_str(&text.text);
        }
    }
}
