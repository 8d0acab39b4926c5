//! Reader dispatch: file extension → format parser → plain text.
//!
//! [`UniversalReader`] holds an explicit table from the closed [`FileFormat`]
//! enumeration to a [`DocumentParser`]. Dispatch is a two-step lookup:
//! extension → `FileFormat` (a `match`, no dynamic discovery), then
//! `FileFormat` → parser. A format can be known to the enum yet missing from
//! the table (Excel without the `excel` feature); both cases surface as
//! [`ReportError::UnsupportedFormat`].
//!
//! ## Failure policy
//!
//! Parser errors never escape [`UniversalReader::read`]. They are logged and
//! the call returns an empty list, so a corrupt file looks the same to the
//! caller as a file with no text. [`UniversalReader::read_outcome`] keeps the
//! swallowed error alongside the (empty) list so the pipeline can name it when
//! it stops with [`ReportError::EmptyExtraction`]. Missing paths and unknown
//! extensions are the caller's mistake and do propagate.

use crate::error::{ReaderError, ReportError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod csv_reader;
pub mod docx_reader;
#[cfg(feature = "excel")]
pub mod excel_reader;
pub mod json_reader;
pub mod pdf_reader;
pub mod pptx_reader;
pub mod text_reader;

pub use csv_reader::CsvReader;
pub use docx_reader::DocxReader;
#[cfg(feature = "excel")]
pub use excel_reader::ExcelReader;
pub use json_reader::JsonReader;
pub use pdf_reader::PdfReader;
pub use pptx_reader::PptxReader;
pub use text_reader::TextReader;

/// Every input format the crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FileFormat {
    Pdf,
    Csv,
    Docx,
    Pptx,
    Json,
    Txt,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub const ALL: [FileFormat; 8] = [
        FileFormat::Pdf,
        FileFormat::Csv,
        FileFormat::Docx,
        FileFormat::Pptx,
        FileFormat::Json,
        FileFormat::Txt,
        FileFormat::Xlsx,
        FileFormat::Xls,
    ];

    /// Map an extension (with or without the leading dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(FileFormat::Pdf),
            "csv" => Some(FileFormat::Csv),
            "docx" => Some(FileFormat::Docx),
            "pptx" => Some(FileFormat::Pptx),
            "json" => Some(FileFormat::Json),
            "txt" => Some(FileFormat::Txt),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }

    /// Canonical dotted extension, e.g. `".pdf"`.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Pdf => ".pdf",
            FileFormat::Csv => ".csv",
            FileFormat::Docx => ".docx",
            FileFormat::Pptx => ".pptx",
            FileFormat::Json => ".json",
            FileFormat::Txt => ".txt",
            FileFormat::Xlsx => ".xlsx",
            FileFormat::Xls => ".xls",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One unit of parsed content.
///
/// `content` is `None` when the parser produced the unit but could not give it
/// text (an image-only PDF page, an empty slide). Such documents are skipped by
/// [`extract_text`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source label, e.g. `"q3_report_2"` for page 2 of `q3_report.pdf`.
    pub name: String,
    pub content: Option<String>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }

    /// A document without a text payload.
    pub fn without_text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }
}

/// A format-specific parser: file in, documents out.
pub trait DocumentParser: Send + Sync {
    /// Human-readable parser name used in logs.
    fn name(&self) -> &'static str;

    fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError>;
}

/// Documents from one dispatch, plus the parser failure that emptied them.
#[derive(Debug, Clone, Default)]
pub struct ReadOutcome {
    pub documents: Vec<Document>,
    /// Set when the parser errored or panicked; `documents` is then empty.
    pub failure: Option<ReaderError>,
}

/// Extension-dispatching reader over a table of [`DocumentParser`]s.
#[derive(Clone)]
pub struct UniversalReader {
    parsers: BTreeMap<FileFormat, Arc<dyn DocumentParser>>,
}

impl Default for UniversalReader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UniversalReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.parsers.iter().map(|(k, v)| (k, v.name())))
            .finish()
    }
}

impl UniversalReader {
    /// Reader with every built-in parser registered.
    ///
    /// Excel formats are present only when the `excel` feature is enabled.
    pub fn new() -> Self {
        let reader = Self::empty()
            .with_parser(FileFormat::Pdf, Arc::new(PdfReader))
            .with_parser(FileFormat::Csv, Arc::new(CsvReader))
            .with_parser(FileFormat::Docx, Arc::new(DocxReader))
            .with_parser(FileFormat::Pptx, Arc::new(PptxReader))
            .with_parser(FileFormat::Json, Arc::new(JsonReader))
            .with_parser(FileFormat::Txt, Arc::new(TextReader));

        #[cfg(feature = "excel")]
        let reader = {
            let excel: Arc<dyn DocumentParser> = Arc::new(ExcelReader);
            reader
                .with_parser(FileFormat::Xlsx, Arc::clone(&excel))
                .with_parser(FileFormat::Xls, excel)
        };

        reader
    }

    /// Reader with no parsers; every dispatch fails with `UnsupportedFormat`.
    pub fn empty() -> Self {
        Self {
            parsers: BTreeMap::new(),
        }
    }

    /// Register (or replace) the parser for `format`.
    pub fn with_parser(mut self, format: FileFormat, parser: Arc<dyn DocumentParser>) -> Self {
        self.parsers.insert(format, parser);
        self
    }

    pub fn supports(&self, format: FileFormat) -> bool {
        self.parsers.contains_key(&format)
    }

    /// Registered extensions in enum order, e.g. `[".pdf", ".csv", …]`.
    pub fn supported_extensions(&self) -> Vec<&'static str> {
        self.parsers.keys().map(|f| f.extension()).collect()
    }

    /// Parse `path` with the parser registered for its extension.
    ///
    /// # Errors
    /// - [`ReportError::FileNotFound`] if `path` does not exist (checked first)
    /// - [`ReportError::UnsupportedFormat`] if no parser handles the extension
    ///
    /// A failing parser yields `Ok(vec![])`.
    pub fn read(&self, path: impl AsRef<Path>) -> Result<Vec<Document>, ReportError> {
        self.read_outcome(path).map(|outcome| outcome.documents)
    }

    /// Like [`read`](Self::read), but also returns the parser failure.
    pub fn read_outcome(&self, path: impl AsRef<Path>) -> Result<ReadOutcome, ReportError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ReportError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let parser = FileFormat::from_extension(&extension)
            .and_then(|format| self.parsers.get(&format))
            .ok_or_else(|| ReportError::UnsupportedFormat {
                extension: extension.clone(),
            })?;

        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!("Using reader: {} for {}", parser.name(), display_name);

        let outcome = catch_unwind(AssertUnwindSafe(|| parser.parse(path))).unwrap_or_else(|_| {
            Err(ReaderError::Panicked {
                parser: parser.name().to_string(),
            })
        });

        match outcome {
            Ok(documents) => {
                if documents.is_empty() {
                    warn!("No content extracted from {}", display_name);
                } else {
                    debug!("{} returned {} documents", parser.name(), documents.len());
                }
                Ok(ReadOutcome {
                    documents,
                    failure: None,
                })
            }
            Err(e) => {
                warn!("Error reading {} with {}: {}", display_name, parser.name(), e);
                Ok(ReadOutcome {
                    documents: Vec::new(),
                    failure: Some(e),
                })
            }
        }
    }
}

/// Concatenate document payloads into one string.
///
/// Each payload is trimmed and followed by `\n`; the result is trimmed once
/// more. Documents without a payload are skipped.
pub fn extract_text(docs: &[Document]) -> String {
    let mut content = String::new();
    for text in docs.iter().filter_map(|d| d.content.as_deref()) {
        content.push_str(text.trim());
        content.push('\n');
    }
    content.trim().to_string()
}

/// File stem used as the base of document names.
pub(crate) fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string())
}
