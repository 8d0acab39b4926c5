//! CLI binary for edgequake-finreport.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalysisConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use edgequake_finreport::config::{DEFAULT_CONTEXT_CHARS, DEFAULT_LEADER_MODEL, DEFAULT_MEMBER_MODEL, DEFAULT_OUTPUT_PATH};
use edgequake_finreport::{
    analyze_to_pdf, AnalysisConfig, AnalysisOutput, AnalysisProgressCallback, ProgressCallback,
    UniversalReader,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one spinner naming the agent currently at work, plus a
/// log line per finished step. Agent calls take tens of seconds, so the
/// spinner's elapsed time is the useful part.
struct CliProgressCallback {
    bar: ProgressBar,
    step_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed_precise:.dim}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Reading");
        bar.set_message("Opening document…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            step_started: Mutex::new(None),
        })
    }

    fn step_elapsed(&self) -> f64 {
        self.step_started
            .lock()
            .ok()
            .and_then(|mut t| t.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_document_read(&self, source: &Path, documents: usize, chars: usize) {
        self.bar.println(format!(
            "{} Extracted {} characters from {} ({} document{})",
            cyan("◆"),
            bold(&chars.to_string()),
            source.display(),
            documents,
            if documents == 1 { "" } else { "s" }
        ));
        self.bar.set_prefix("Analysing");
    }

    fn on_agent_start(&self, agent: &str, step: usize, total_steps: usize) {
        if let Ok(mut t) = self.step_started.lock() {
            *t = Some(Instant::now());
        }
        self.bar.set_message(format!("{agent} ({step}/{total_steps})"));
    }

    fn on_agent_complete(&self, agent: &str, step: usize, total_steps: usize, response_len: usize) {
        let secs = self.step_elapsed();
        self.bar.println(format!(
            "  {} {:>1}/{:<1}  {:<24}  {}  {}",
            green("✓"),
            step,
            total_steps,
            agent,
            dim(&format!("{response_len:>6} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        if step == total_steps {
            self.bar.set_prefix("Rendering");
            self.bar.set_message("Writing PDF…");
        }
    }

    fn on_report_written(&self, _path: &Path, _pages: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a spreadsheet; report lands in output/final_financial_report.pdf
  finreport q3_results.xlsx

  # Ask for the path interactively
  finreport

  # Choose where the PDF goes
  finreport annual_report.pdf -o reports/annual.pdf

  # Different models for the members and the leader
  finreport --model gpt-4.1-mini --leader-model o3 statements.csv

  # Print every agent's answer, then the summary
  finreport --show-members board_deck.pptx

  # Analyse a document straight from a URL
  finreport https://example.com/filings/10-q.pdf

  # Machine-readable output (report, member answers, stats)
  finreport --json ledger.json > run.json

TEAM:
  Data Analyst Agent       KPIs, trends, growth rates         (--model)
  Risk Evaluator Agent     liquidity, leverage, top 3 risks   (--model)
  Market Strategist Agent  outlook and recommendations        (--model)
  Finance Analysis Team    leader; writes the final report    (--leader-model)

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID for every agent
  RUST_LOG                Log filter (overrides --verbose / --quiet)

  A .env file in the working directory is loaded at start-up.
"#;

/// Analyse a financial document with a team of LLM agents and write a PDF report.
#[derive(Parser, Debug)]
#[command(
    name = "finreport",
    version,
    about = "Analyse financial documents with a multi-agent LLM team and write a PDF report",
    long_about = "Reads a financial document (PDF, CSV, DOCX, PPTX, JSON, TXT, XLSX, XLS — local \
file or URL), has a data analyst, a risk evaluator and a market strategist agent work through it, \
and lets a lead editor agent merge their findings into one report rendered as a PDF.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local file path or HTTP/HTTPS URL. Asked for interactively when omitted.
    input: Option<String>,

    /// Where to write the PDF report.
    #[arg(short, long, env = "FINREPORT_OUTPUT", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Model for the three member agents.
    #[arg(long, env = "FINREPORT_MODEL", default_value = DEFAULT_MEMBER_MODEL)]
    model: String,

    /// Model for the team leader that writes the report.
    #[arg(long, env = "FINREPORT_LEADER_MODEL", default_value = DEFAULT_LEADER_MODEL)]
    leader_model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(
        long,
        env = "EDGEQUAKE_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: openai, anthropic, gemini, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0). Provider default when omitted.
    #[arg(long, env = "FINREPORT_TEMPERATURE")]
    temperature: Option<f32>,

    /// Max output tokens per agent call.
    #[arg(long, env = "FINREPORT_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Characters of extracted text sent to the team.
    #[arg(long, env = "FINREPORT_CONTEXT_CHARS", default_value_t = DEFAULT_CONTEXT_CHARS)]
    context_chars: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "FINREPORT_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print each member agent's answer to stdout.
    #[arg(long, env = "FINREPORT_SHOW_MEMBERS")]
    show_members: bool,

    /// Output structured JSON (AnalysisOutput) on stdout.
    #[arg(long, env = "FINREPORT_JSON")]
    json: bool,

    /// List supported file extensions and exit.
    #[arg(long)]
    formats: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "FINREPORT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FINREPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FINREPORT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; it
    // already says what is happening.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let reader = UniversalReader::new();

    // ── Formats listing ──────────────────────────────────────────────────
    if cli.formats {
        for ext in reader.supported_extensions() {
            println!("{ext}");
        }
        return Ok(());
    }

    // ── Input ────────────────────────────────────────────────────────────
    let input = match cli.input.clone() {
        Some(input) => input,
        None => prompt_for_input(&reader)?,
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn AnalysisProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = analyze_to_pdf(&input, &cli.output, &config)
        .await
        .context("Analysis failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    if cli.show_members {
        print_members(&output).context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  Final financial report saved to: {}  ({} page{}, {}ms)",
            green("✔"),
            bold(&cli.output.display().to_string()),
            stats.pages_written,
            if stats.pages_written == 1 { "" } else { "s" },
            stats.total_duration_ms,
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&stats.total_input_tokens.to_string()),
            dim(&stats.total_output_tokens.to_string()),
        );
        if stats.was_truncated() {
            eprintln!(
                "   {}",
                dim(&format!(
                    "only the first {} of {} extracted characters were analysed",
                    stats.chars_sent, stats.chars_extracted
                ))
            );
        }
    }

    Ok(())
}

/// Ask for the input path on stdin.
fn prompt_for_input(reader: &UniversalReader) -> Result<String> {
    let formats = reader
        .supported_extensions()
        .iter()
        .map(|e| e.trim_start_matches('.').to_uppercase())
        .collect::<Vec<_>>()
        .join(", ");
    eprintln!("{}", bold("Multi-Agent Financial Analyzer"));
    eprintln!("Supported formats: {formats}");
    eprint!("Enter file path to analyze: ");
    io::stderr().flush().ok();

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read file path from stdin")?;
    let path = line.trim();
    if path.is_empty() {
        bail!("No file path given");
    }
    Ok(path.to_string())
}

fn print_members(output: &AnalysisOutput) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for member in &output.member_responses {
        writeln!(handle, "{}", cyan(&format!("── {} ──", member.agent)))?;
        writeln!(handle, "{}\n", member.content.trim_end())?;
    }
    Ok(())
}

/// Map CLI args to `AnalysisConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .member_model(&cli.model)
        .leader_model(&cli.leader_model)
        .context_chars(cli.context_chars)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    if let Some(t) = cli.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_tokens(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
