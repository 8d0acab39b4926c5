//! Report rendering: lay plain text out on fixed-size pages and write a PDF.
//!
//! ## Layout model
//!
//! The cursor starts at [`PageLayout::top`] and steps down by
//! `line_height` for every drawn line. Before a line is drawn, the renderer
//! checks whether its whole slot still sits above `bottom_margin`; if not, a
//! fresh page is started and the cursor returns to `top`. With the default
//! geometry that is exactly 44 lines per page.
//!
//! Each input line is word-wrapped against `max_line_width` using Helvetica
//! advance widths, so a long paragraph becomes several consecutive lines.
//! Blank input lines still take one slot, which keeps paragraph spacing in
//! the rendered report.
//!
//! ## Why lopdf and Type1 Helvetica?
//!
//! The output is text only. A hand-assembled object graph (catalog → pages →
//! page → content stream) with a standard-14 font keeps the file tiny and
//! avoids shipping font binaries. Each line is its own `BT … ET` block, which
//! also makes the text extract back line-by-line.

use crate::config::PageLayout;
use crate::error::ReportError;
use crate::pipeline::font::{encode_latin1, to_win_ansi, wrap_line};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// One line placed on a page, with its baseline `y` in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub y: f32,
}

/// The lines placed on one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedPage {
    pub lines: Vec<PlacedLine>,
}

/// Split `text` into pages according to `layout`.
///
/// Always returns at least one page; empty input produces a single blank
/// page. A layout with no room for a line still never yields an empty
/// leading page; [`write_pdf`] rejects such layouts outright. Text is folded to WinAnsi before measuring, so the widths used for
/// wrapping are the widths that end up on the page.
pub fn paginate(text: &str, layout: &PageLayout) -> Vec<RenderedPage> {
    let mut pages = Vec::new();
    let mut current = RenderedPage::default();
    let mut y = layout.top;

    for raw in text.split('\n') {
        let line = to_win_ansi(raw);
        for wrapped in wrap_line(&line, layout.max_line_width, layout.font_size) {
            if y - layout.line_height < layout.bottom_margin && !current.lines.is_empty() {
                pages.push(std::mem::take(&mut current));
                y = layout.top;
            }
            current.lines.push(PlacedLine { text: wrapped, y });
            y -= layout.line_height;
        }
    }

    pages.push(current);
    pages
}

/// Render `text` into a PDF at `path`, returning the page count.
///
/// Missing parent directories are created. An existing file is replaced;
/// the PDF is first written next to the target and then renamed over it, so
/// a failure never leaves a truncated report behind.
pub fn write_pdf(text: &str, path: &Path, layout: &PageLayout) -> Result<usize, ReportError> {
    layout.validate()?;
    let pages = paginate(text, layout);
    let bytes = build_pdf(&pages, layout).map_err(|detail| ReportError::PdfBuildFailed {
        path: path.to_path_buf(),
        detail,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ReportError::OutputWriteFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, &bytes).map_err(|e| ReportError::OutputWriteFailed {
        path: tmp_path.clone(),
        source: e,
    })?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(ReportError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    info!(
        "Wrote {} page(s), {} bytes to {}",
        pages.len(),
        bytes.len(),
        path.display()
    );
    Ok(pages.len())
}

/// Serialise already-paginated pages into PDF bytes.
pub fn build_pdf(pages: &[RenderedPage], layout: &PageLayout) -> Result<Vec<u8>, String> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        layout.page_width.into(),
        layout.page_height.into(),
    ];

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        let content = page_content(page, layout)
            .encode()
            .map_err(|e| format!("page {}: {e}", i + 1))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => media_box.clone(),
        });
        kids.push(page_id.into());
        debug!("Page {}: {} line(s)", i + 1, page.lines.len());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

fn page_content(page: &RenderedPage, layout: &PageLayout) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    // Blank lines keep their slot but draw nothing.
    for line in page.lines.iter().filter(|l| !l.text.is_empty()) {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec!["F1".into(), layout.font_size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![layout.margin_left.into(), line.y.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(
                encode_latin1(&line.text),
                StringFormat::Literal,
            )],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}
