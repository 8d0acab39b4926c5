//! # edgequake-finreport
//!
//! Turn a financial document into a multi-agent LLM analysis report and
//! render it as a paginated PDF.
//!
//! ## Why this crate?
//!
//! A single prompt asked to "analyse this balance sheet" tends to produce a
//! shallow summary. This crate splits the job the way a finance desk does: a
//! data analyst reads the numbers, a risk evaluator builds on those findings,
//! a market strategist builds on both, and a lead editor merges everything
//! into one report with an executive summary, key takeaways and a dated
//! sign-off.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file / URL
//!  │
//!  ├─ 1. Input   resolve local file or download from URL
//!  ├─ 2. Read    pick a reader by extension (pdf, csv, docx, pptx, json,
//!  │             txt, xlsx, xls) and flatten the documents to text
//!  ├─ 3. Prompt  task template + first 8000 characters of the text
//!  ├─ 4. Team    analyst → risk evaluator → strategist → leader
//!  └─ 5. Render  word-wrap to 520 pt, 44 lines per Letter page, write PDF
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_finreport::{analyze_to_pdf, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / ...
//!     let config = AnalysisConfig::default();
//!     let output = analyze_to_pdf("q3_results.xlsx", "output/report.pdf", &config).await?;
//!     eprintln!("{} pages, tokens: {} in / {} out",
//!         output.stats.pages_written,
//!         output.stats.total_input_tokens,
//!         output.stats.total_output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `finreport` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `excel` | on      | Registers the `.xlsx` / `.xls` readers (calamine) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-finreport = { version = "0.1", default-features = false, features = ["excel"] }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod reader;
pub mod team;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_sync, analyze_to_pdf, analyze_with_reader, write_report};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, PageLayout};
pub use error::{ReaderError, ReportError};
pub use output::{AnalysisOutput, AnalysisStats};
pub use pipeline::render::{paginate, write_pdf, RenderedPage};
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
pub use reader::{
    extract_text, Document, DocumentParser, FileFormat, ReadOutcome, UniversalReader,
};
pub use team::{AgentRole, FinanceTeam, MemberResponse, ReportOrchestrator, TeamResponse};
