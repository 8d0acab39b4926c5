//! Top-level entry points: document in, report (and PDF) out.
//!
//! [`analyze`] runs everything up to the leader's report text;
//! [`analyze_to_pdf`] additionally paginates it into a PDF. Both stop with
//! [`ReportError::EmptyExtraction`] before any LLM request when the document
//! yields no text, so a corrupt or image-only file costs nothing.

use crate::config::AnalysisConfig;
use crate::error::ReportError;
use crate::output::{AnalysisOutput, AnalysisStats};
use crate::pipeline::{input, render};
use crate::prompts::{build_analysis_prompt, truncate_context};
use crate::reader::{extract_text, ReadOutcome, UniversalReader};
use crate::team::{FinanceTeam, ReportOrchestrator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Analyse a document and return the report.
///
/// # Arguments
/// * `input`  — local file path or HTTP/HTTPS URL
/// * `config` — analysis configuration
///
/// # Errors
/// - File not found / permission denied / download failure
/// - Unsupported extension
/// - No text extracted
/// - Provider not configured, or any agent call failed
pub async fn analyze(
    input: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    analyze_with_reader(input, &UniversalReader::new(), config).await
}

/// Like [`analyze`], with a caller-supplied reader registry.
pub async fn analyze_with_reader(
    input: impl AsRef<str>,
    reader: &UniversalReader,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    let total_start = Instant::now();
    let source = input.as_ref();
    info!("Starting analysis: {}", source);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(source, config.download_timeout_secs).await?;
    let path = resolved.path().to_path_buf();

    // ── Step 2: Read and flatten ─────────────────────────────────────────
    let read_start = Instant::now();
    let ReadOutcome { documents, failure } = {
        let reader = reader.clone();
        let path = path.clone();
        tokio::task::spawn_blocking(move || reader.read_outcome(&path))
            .await
            .map_err(|e| ReportError::Internal(format!("Reader task panicked: {}", e)))??
    };
    let text = extract_text(&documents);
    let read_duration_ms = read_start.elapsed().as_millis() as u64;

    if text.trim().is_empty() {
        let reason = match failure {
            Some(e) => e.to_string(),
            None if documents.is_empty() => "the reader returned no documents".to_string(),
            None => format!("{} document(s) contained no text", documents.len()),
        };
        return Err(ReportError::EmptyExtraction {
            path: PathBuf::from(source),
            reason,
        });
    }

    let chars_extracted = text.chars().count();
    info!(
        "Extracted {} characters from {} document(s)",
        chars_extracted,
        documents.len()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_read(&path, documents.len(), chars_extracted);
    }

    // ── Step 3: Build prompt ─────────────────────────────────────────────
    let chars_sent = truncate_context(&text, config.context_chars).chars().count();
    let prompt = build_analysis_prompt(&text, config.context_chars);
    debug!(
        "Prompt: {} characters ({} of {} extracted)",
        prompt.chars().count(),
        chars_sent,
        chars_extracted
    );

    // ── Step 4: Run the team ─────────────────────────────────────────────
    let orchestrator: Arc<dyn ReportOrchestrator> = match config.orchestrator {
        Some(ref o) => Arc::clone(o),
        None => Arc::new(FinanceTeam::from_config(config)?),
    };
    let llm_start = Instant::now();
    let response = orchestrator.run(&prompt).await?;
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // The report is paginated as returned; font folding drops `\r` and
    // invisible characters at render time.
    let report = response.content;

    let stats = AnalysisStats {
        documents_read: documents.len(),
        chars_extracted,
        chars_sent,
        pages_written: 0,
        total_input_tokens: response.input_tokens,
        total_output_tokens: response.output_tokens,
        read_duration_ms,
        llm_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Analysis complete: {} report characters, {}ms total",
        report.len(),
        stats.total_duration_ms
    );

    Ok(AnalysisOutput {
        source: source.to_string(),
        report,
        member_responses: response.member_responses,
        pdf_path: None,
        stats,
    })
}

/// Analyse a document and write the report as a PDF.
///
/// The destination directory is created if needed and an existing file is
/// replaced. Nothing is written when the analysis fails.
pub async fn analyze_to_pdf(
    input: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    let total_start = Instant::now();
    let mut output = analyze(input, config).await?;
    write_report(&mut output, output_path.as_ref(), config).await?;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Render `output.report` to `path` and record the result on `output`.
pub async fn write_report(
    output: &mut AnalysisOutput,
    path: &Path,
    config: &AnalysisConfig,
) -> Result<usize, ReportError> {
    let pages = {
        let text = output.report.clone();
        let path = path.to_path_buf();
        let layout = config.layout;
        tokio::task::spawn_blocking(move || render::write_pdf(&text, &path, &layout))
            .await
            .map_err(|e| ReportError::Internal(format!("Render task panicked: {}", e)))??
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_report_written(path, pages);
    }
    output.pdf_path = Some(path.to_path_buf());
    output.stats.pages_written = pages;
    Ok(pages)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, ReportError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ReportError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(input, config))
}
