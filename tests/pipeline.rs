//! Offline integration tests: real readers, real PDF rendering, a stub team.
//!
//! No network and no API key needed; the hosted agents are replaced by a
//! [`ReportOrchestrator`] that records its prompt and returns a fixed report.

use async_trait::async_trait;
use edgequake_finreport::{
    analyze, analyze_sync, analyze_to_pdf, analyze_with_reader, paginate, AnalysisConfig,
    AnalysisProgressCallback, Document, DocumentParser, FileFormat, MemberResponse, PageLayout,
    ReaderError, ReportError, ReportOrchestrator, TeamResponse, UniversalReader,
};
use lopdf::content::Content;
use lopdf::Object;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

struct StubTeam {
    report: String,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl StubTeam {
    fn answering(report: &str) -> Arc<Self> {
        Arc::new(Self {
            report: report.to_string(),
            prompts: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            report: String::new(),
            prompts: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ReportOrchestrator for StubTeam {
    async fn run(&self, prompt: &str) -> Result<TeamResponse, ReportError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(ReportError::LlmApiError {
                agent: "Finance Analysis Team".into(),
                message: "500 Internal Server Error".into(),
            });
        }
        Ok(TeamResponse {
            content: self.report.clone(),
            member_responses: vec![MemberResponse {
                agent: "Data Analyst Agent".into(),
                content: "KPIs look fine".into(),
                input_tokens: 100,
                output_tokens: 40,
                duration_ms: 5,
            }],
            input_tokens: 300,
            output_tokens: 120,
        })
    }
}

fn config_with(team: Arc<StubTeam>) -> AnalysisConfig {
    AnalysisConfig::builder()
        .orchestrator(team as Arc<dyn ReportOrchestrator>)
        .build()
        .unwrap()
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn drawn_lines(path: &Path) -> Vec<Vec<String>> {
    let mut doc = lopdf::Document::load(path).unwrap();
    doc.decompress();
    doc.get_pages()
        .values()
        .map(|&id| {
            Content::decode(&doc.get_page_content(id).unwrap())
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| match &op.operands[0] {
                    Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
                    other => panic!("unexpected Tj operand {other:?}"),
                })
                .collect()
        })
        .collect()
}

// ── End-to-end with the stub team ────────────────────────────────────────────

#[tokio::test]
async fn csv_to_pdf_report() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "q3.csv", "Quarter,Revenue\nQ3,120\n");
    let out = dir.path().join("output/final_financial_report.pdf");
    let team = StubTeam::answering("# Executive Summary\nRevenue grew.");

    let output = analyze_to_pdf(input.to_str().unwrap(), &out, &config_with(Arc::clone(&team)))
        .await
        .unwrap();

    assert_eq!(team.calls(), 1);
    assert!(team.last_prompt().contains("File Context:\nQuarter, Revenue\nQ3, 120"));
    assert_eq!(output.report, "# Executive Summary\nRevenue grew.");
    assert_eq!(output.pdf_path.as_deref(), Some(out.as_path()));
    assert_eq!(output.stats.pages_written, 1);
    assert_eq!(output.stats.documents_read, 1);
    assert_eq!(output.stats.total_input_tokens, 300);
    assert_eq!(output.member_responses.len(), 1);
    assert_eq!(
        drawn_lines(&out),
        vec![vec!["# Executive Summary", "Revenue grew."]]
    );
}

#[tokio::test]
async fn report_is_rendered_verbatim() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "notes.txt", "Cash 40, debt 10");
    let raw = "Intro\n## Risks\n| A |\n|---|\n| 1 |\n|---|\n| 2 |\n\n\n\n\nEnd";
    let out = dir.path().join("report.pdf");

    let output = analyze_to_pdf(input.to_str().unwrap(), &out, &config_with(StubTeam::answering(raw)))
        .await
        .unwrap();

    assert_eq!(output.report, raw);
    let layout = PageLayout::default();
    let pages = paginate(&output.report, &layout);
    assert_eq!(pages[0].lines.len(), 12);
    assert_eq!(pages[0].lines[11].text, "End");
    assert_eq!(pages[0].lines[11].y, layout.top - 11.0 * layout.line_height);
    assert_eq!(
        drawn_lines(&out),
        vec![vec!["Intro", "## Risks", "| A |", "|---|", "| 1 |", "|---|", "| 2 |", "End"]]
    );
}

#[tokio::test]
async fn long_report_spans_pages() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "notes.txt", "Revenue 120");
    let per_page = PageLayout::default().lines_per_page();
    let report = (1..=per_page * 2)
        .map(|i| format!("Finding {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let out = dir.path().join("report.pdf");

    let output = analyze_to_pdf(input.to_str().unwrap(), &out, &config_with(StubTeam::answering(&report)))
        .await
        .unwrap();

    assert_eq!(output.stats.pages_written, 2);
    let pages = drawn_lines(&out);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].len(), per_page);
    assert_eq!(pages[1][0], format!("Finding {}", per_page + 1));
}

#[tokio::test]
async fn only_first_8000_characters_are_sent() {
    let dir = TempDir::new().unwrap();
    let body: String = "0123456789".repeat(900);
    let input = write_file(&dir, "ledger.txt", &body);
    let team = StubTeam::answering("ok");

    let output = analyze(input.to_str().unwrap(), &config_with(Arc::clone(&team)))
        .await
        .unwrap();

    let prompt = team.last_prompt();
    assert!(prompt.ends_with(&body[..8000]));
    assert!(!prompt.contains(&body[..8001]));
    assert_eq!(output.stats.chars_extracted, 9000);
    assert_eq!(output.stats.chars_sent, 8000);
    assert!(output.stats.was_truncated());
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_document_stops_before_the_team() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "blank.txt", "   \n\n");
    let out = dir.path().join("report.pdf");
    let team = StubTeam::answering("never used");

    let err = analyze_to_pdf(input.to_str().unwrap(), &out, &config_with(Arc::clone(&team)))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::EmptyExtraction { .. }), "got {err:?}");
    assert_eq!(team.calls(), 0);
    assert!(!out.exists());
}

#[tokio::test]
async fn corrupt_file_degrades_to_empty_extraction() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.docx");
    std::fs::write(&input, b"definitely not a zip archive").unwrap();
    let team = StubTeam::answering("never used");

    let err = analyze(input.to_str().unwrap(), &config_with(Arc::clone(&team)))
        .await
        .unwrap_err();

    match err {
        ReportError::EmptyExtraction { reason, .. } => {
            assert!(reason.starts_with("DocxReader: malformed input"), "got {reason}")
        }
        other => panic!("expected EmptyExtraction, got {other:?}"),
    }
    assert_eq!(team.calls(), 0);
}

#[tokio::test]
async fn missing_file_is_reported() {
    let err = analyze("/no/such/dir/q3.csv", &config_with(StubTeam::answering("x")))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::FileNotFound { .. }), "got {err:?}");
}

#[tokio::test]
async fn unsupported_extension_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "filing.xml", "<revenue>120</revenue>");
    let err = analyze(input.to_str().unwrap(), &config_with(StubTeam::answering("x")))
        .await
        .unwrap_err();
    match err {
        ReportError::UnsupportedFormat { extension } => assert_eq!(extension, ".xml"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
}

#[tokio::test]
async fn team_failure_leaves_no_pdf() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "q3.csv", "Revenue,120");
    let out = dir.path().join("report.pdf");

    let err = analyze_to_pdf(input.to_str().unwrap(), &out, &config_with(StubTeam::failing()))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportError::LlmApiError { .. }), "got {err:?}");
    assert!(!out.exists());
}

// ── Extension points ─────────────────────────────────────────────────────────

#[tokio::test]
async fn progress_callback_sees_read_and_write() {
    #[derive(Default)]
    struct Events {
        chars: AtomicUsize,
        pages: AtomicUsize,
    }
    impl AnalysisProgressCallback for Events {
        fn on_document_read(&self, _source: &Path, _documents: usize, chars: usize) {
            self.chars.store(chars, Ordering::SeqCst);
        }
        fn on_report_written(&self, _path: &Path, pages: usize) {
            self.pages.store(pages, Ordering::SeqCst);
        }
    }

    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "q3.txt", "Revenue 120");
    let events = Arc::new(Events::default());
    let config = AnalysisConfig::builder()
        .orchestrator(StubTeam::answering("Summary") as Arc<dyn ReportOrchestrator>)
        .progress_callback(Arc::clone(&events) as Arc<dyn AnalysisProgressCallback>)
        .build()
        .unwrap();

    analyze_to_pdf(input.to_str().unwrap(), dir.path().join("r.pdf"), &config)
        .await
        .unwrap();

    assert_eq!(events.chars.load(Ordering::SeqCst), "Revenue 120".len());
    assert_eq!(events.pages.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn custom_parser_is_used() {
    struct Upper;
    impl DocumentParser for Upper {
        fn name(&self) -> &'static str {
            "Upper"
        }
        fn parse(&self, path: &Path) -> Result<Vec<Document>, ReaderError> {
            let text = std::fs::read_to_string(path).map_err(|e| ReaderError::Io {
                parser: "Upper".into(),
                detail: e.to_string(),
            })?;
            Ok(vec![Document::new("upper", text.to_uppercase())])
        }
    }

    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "memo.txt", "net income up");
    let reader = UniversalReader::new().with_parser(FileFormat::Txt, Arc::new(Upper));
    let team = StubTeam::answering("ok");

    analyze_with_reader(input.to_str().unwrap(), &reader, &config_with(Arc::clone(&team)))
        .await
        .unwrap();

    assert!(team.last_prompt().ends_with("NET INCOME UP"));
}

#[test]
fn sync_wrapper_runs_without_a_runtime() {
    let dir = TempDir::new().unwrap();
    let input = write_file(&dir, "ledger.json", r#"[{"q":"Q3","revenue":120}]"#);
    let team = StubTeam::answering("Report body");

    let output = analyze_sync(input.to_str().unwrap(), &config_with(Arc::clone(&team))).unwrap();

    assert_eq!(output.report, "Report body");
    assert!(team.last_prompt().contains(r#"{"q":"Q3","revenue":120}"#));
}
