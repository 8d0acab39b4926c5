//! Progress-callback trait for run events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to be told
//! when the document has been read, when each agent starts and finishes, and
//! when the PDF lands on disk. Agent calls take tens of seconds each, so a
//! terminal front-end wants something to show in the meantime.
//!
//! # Example
//!
//! ```rust
//! use edgequake_finreport::{AnalysisConfig, AnalysisProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     agents_done: AtomicUsize,
//! }
//!
//! impl AnalysisProgressCallback for CountingCallback {
//!     fn on_agent_complete(&self, agent: &str, _step: usize, _total: usize, len: usize) {
//!         self.agents_done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{agent} wrote {len} bytes");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { agents_done: AtomicUsize::new(0) });
//! let config = AnalysisConfig::builder()
//!     .progress_callback(cb as Arc<dyn AnalysisProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as a run advances.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because the
/// config holding them is shared across tasks.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called once the input has been parsed and its text extracted.
    ///
    /// # Arguments
    /// * `source`    — the path that was read
    /// * `documents` — number of documents the parser returned
    /// * `chars`     — characters of extracted text
    fn on_document_read(&self, source: &Path, documents: usize, chars: usize) {
        let _ = (source, documents, chars);
    }

    /// Called just before an agent's LLM request is sent.
    ///
    /// `step` is 1-indexed; `total_steps` counts members plus the leader.
    fn on_agent_start(&self, agent: &str, step: usize, total_steps: usize) {
        let _ = (agent, step, total_steps);
    }

    /// Called when an agent has answered.
    fn on_agent_complete(&self, agent: &str, step: usize, total_steps: usize, response_len: usize) {
        let _ = (agent, step, total_steps, response_len);
    }

    /// Called after the PDF has been written.
    fn on_report_written(&self, path: &Path, pages: usize) {
        let _ = (path, pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;
