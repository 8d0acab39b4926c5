//! Output types returned by the `analyze*` entry points.

use crate::team::MemberResponse;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything a run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Path or URL the document was read from, as given.
    pub source: String,
    /// The leader's report exactly as returned (what goes on the PDF pages).
    pub report: String,
    /// Individual member answers, in run order.
    pub member_responses: Vec<MemberResponse>,
    /// Where the PDF was written, when one was.
    pub pdf_path: Option<PathBuf>,
    pub stats: AnalysisStats,
}

/// Counters and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Documents returned by the format reader.
    pub documents_read: usize,
    /// Characters of extracted text.
    pub chars_extracted: usize,
    /// Characters of extracted text placed in the prompt.
    pub chars_sent: usize,
    /// PDF pages written; 0 when no PDF was rendered.
    pub pages_written: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub read_duration_ms: u64,
    pub llm_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl AnalysisStats {
    /// True when the prompt carried only part of the extracted text.
    pub fn was_truncated(&self) -> bool {
        self.chars_sent < self.chars_extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_flag() {
        let stats = AnalysisStats {
            chars_extracted: 12_000,
            chars_sent: 8_000,
            ..Default::default()
        };
        assert!(stats.was_truncated());
        assert!(!AnalysisStats::default().was_truncated());
    }

    #[test]
    fn output_serialises_to_json() {
        let out = AnalysisOutput {
            source: "q3.csv".into(),
            report: "# Executive Summary".into(),
            member_responses: vec![],
            pdf_path: None,
            stats: AnalysisStats::default(),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["source"], "q3.csv");
        assert_eq!(json["stats"]["pages_written"], 0);
        assert!(json["pdf_path"].is_null());
    }
}
