//! Error types for the edgequake-finreport library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ReportError`] — **Fatal**: the run cannot proceed at all (input file
//!   missing, unsupported format, nothing to analyse, provider not
//!   configured, LLM call failed, PDF could not be written). Returned as
//!   `Err(ReportError)` from the top-level `analyze*` functions.
//!
//! * [`ReaderError`] — **Non-fatal**: a format parser choked on the file.
//!   The dispatcher logs it and continues with zero documents, so a corrupt
//!   attachment degrades to "no text" instead of aborting the process. The
//!   run is then stopped by [`ReportError::EmptyExtraction`] before any LLM
//!   cost is incurred.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-finreport library.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// No parser is registered for the file's extension.
    #[error("Unsupported file type: '{extension}'\nRun `finreport --formats` to list supported types.")]
    UnsupportedFormat { extension: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// Parsing produced no text at all. `reason` names the parser failure
    /// when there was one.
    #[error("No readable text found in '{path}': {reason}")]
    EmptyExtraction { path: PathBuf, reason: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API returned an error for one of the agents.
    #[error("LLM API error ({agent}): {message}")]
    LlmApiError { agent: String, message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lopdf refused to serialise the document.
    #[error("Failed to build PDF '{path}': {detail}")]
    PdfBuildFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure inside a single format parser.
///
/// Never escapes [`crate::reader::UniversalReader::read`]; it is logged and
/// converted into an empty document list.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ReaderError {
    /// The file could not be opened or read.
    #[error("{parser}: failed to read file: {detail}")]
    Io { parser: String, detail: String },

    /// The file was read but its contents could not be decoded.
    #[error("{parser}: malformed input: {detail}")]
    Malformed { parser: String, detail: String },

    /// The parser panicked (seen with hostile PDFs).
    #[error("{parser}: parser panicked")]
    Panicked { parser: String },
}

impl ReaderError {
    pub(crate) fn io(parser: &str, err: impl std::fmt::Display) -> Self {
        ReaderError::Io {
            parser: parser.to_string(),
            detail: err.to_string(),
        }
    }

    pub(crate) fn malformed(parser: &str, err: impl std::fmt::Display) -> Self {
        ReaderError::Malformed {
            parser: parser.to_string(),
            detail: err.to_string(),
        }
    }
}
