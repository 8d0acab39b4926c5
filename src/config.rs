//! Configuration types for a financial-analysis run.
//!
//! Every knob lives in [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. The CLI maps its flags onto builder calls; library
//! callers set only what they care about and rely on the defaults below, which
//! reproduce the stock team (gpt-4o-mini members, o4-mini leader, 8000
//! characters of context, US Letter pages in Helvetica 12).

use crate::error::ReportError;
use crate::progress::ProgressCallback;
use crate::team::ReportOrchestrator;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default model for the three member agents.
pub const DEFAULT_MEMBER_MODEL: &str = "gpt-4o-mini";

/// Default model for the team leader.
pub const DEFAULT_LEADER_MODEL: &str = "o4-mini";

/// Number of extracted characters forwarded to the team.
pub const DEFAULT_CONTEXT_CHARS: usize = 8000;

/// Where the CLI writes the report when `--output` is not given.
pub const DEFAULT_OUTPUT_PATH: &str = "output/final_financial_report.pdf";

/// Configuration for one document → report run.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_finreport::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .member_model("gpt-4.1-mini")
///     .context_chars(12_000)
///     .build()
///     .unwrap();
/// assert_eq!(config.context_chars, 12_000);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Model used by the Data Analyst, Risk Evaluator and Market Strategist.
    pub member_model: String,

    /// Model used by the coordinating leader that writes the final report.
    pub leader_model: String,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None, the provider is auto-detected from the environment.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider shared by every agent. Takes precedence
    /// over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Replacement for the built-in finance team. Takes precedence over
    /// every provider setting; tests use it to avoid network calls.
    pub orchestrator: Option<Arc<dyn ReportOrchestrator>>,

    /// Sampling temperature. Default: None (provider default).
    ///
    /// Left unset because reasoning models such as o4-mini reject any value
    /// other than their own default.
    pub temperature: Option<f32>,

    /// Completion token cap per agent call. Default: None (provider default).
    pub max_tokens: Option<usize>,

    /// Characters of extracted text placed in the prompt. Default: 8000.
    pub context_chars: usize,

    /// Put the current date and time in the leader's context. Default: true.
    pub add_datetime_to_context: bool,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Page geometry for the rendered report.
    pub layout: PageLayout,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            member_model: DEFAULT_MEMBER_MODEL.to_string(),
            leader_model: DEFAULT_LEADER_MODEL.to_string(),
            provider_name: None,
            provider: None,
            orchestrator: None,
            temperature: None,
            max_tokens: None,
            context_chars: DEFAULT_CONTEXT_CHARS,
            add_datetime_to_context: true,
            download_timeout_secs: 120,
            layout: PageLayout::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("member_model", &self.member_model)
            .field("leader_model", &self.leader_model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field(
                "orchestrator",
                &self.orchestrator.as_ref().map(|_| "<dyn ReportOrchestrator>"),
            )
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("context_chars", &self.context_chars)
            .field("add_datetime_to_context", &self.add_datetime_to_context)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("layout", &self.layout)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn member_model(mut self, model: impl Into<String>) -> Self {
        self.config.member_model = model.into();
        self
    }

    pub fn leader_model(mut self, model: impl Into<String>) -> Self {
        self.config.leader_model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn orchestrator(mut self, orchestrator: Arc<dyn ReportOrchestrator>) -> Self {
        self.config.orchestrator = Some(orchestrator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = Some(t.clamp(0.0, 2.0));
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = Some(n);
        self
    }

    pub fn context_chars(mut self, n: usize) -> Self {
        self.config.context_chars = n;
        self
    }

    pub fn add_datetime_to_context(mut self, v: bool) -> Self {
        self.config.add_datetime_to_context = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, ReportError> {
        let c = &self.config;
        if c.context_chars == 0 {
            return Err(ReportError::InvalidConfig(
                "Context budget must be ≥ 1 character".into(),
            ));
        }
        if c.max_tokens == Some(0) {
            return Err(ReportError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.member_model.trim().is_empty() || c.leader_model.trim().is_empty() {
            return Err(ReportError::InvalidConfig("Model names must not be empty".into()));
        }
        c.layout.validate()?;
        Ok(self.config)
    }
}

// ── Page geometry ────────────────────────────────────────────────────────

/// Fixed page geometry used by [`crate::pipeline::render`].
///
/// All values are PDF points (1/72 inch). The cursor starts at `top` and moves
/// down by `line_height` per drawn line; a line is only placed while its
/// whole slot stays above `bottom_margin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_left: f32,
    /// Baseline of the first line on every page.
    pub top: f32,
    pub bottom_margin: f32,
    pub line_height: f32,
    pub max_line_width: f32,
    pub font_size: f32,
}

impl Default for PageLayout {
    /// US Letter, Helvetica 12, 16 pt leading.
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_left: 40.0,
            top: 750.0,
            bottom_margin: 40.0,
            line_height: 16.0,
            max_line_width: 520.0,
            font_size: 12.0,
        }
    }
}

impl PageLayout {
    /// Number of lines that fit on one page: `floor((top - bottom) / line_height)`.
    pub fn lines_per_page(&self) -> usize {
        ((self.top - self.bottom_margin) / self.line_height).floor() as usize
    }

    /// Reject geometry that cannot hold a single line.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.line_height <= 0.0 || self.font_size <= 0.0 || self.max_line_width <= 0.0 {
            return Err(ReportError::InvalidConfig(
                "line height, font size and line width must be positive".into(),
            ));
        }
        if self.top > self.page_height || self.bottom_margin < 0.0 {
            return Err(ReportError::InvalidConfig(format!(
                "top offset {} must lie within the page height {}",
                self.top, self.page_height
            )));
        }
        if self.lines_per_page() == 0 {
            return Err(ReportError::InvalidConfig(format!(
                "no line of height {} fits between {} and {}",
                self.line_height, self.top, self.bottom_margin
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_team() {
        let c = AnalysisConfig::default();
        assert_eq!(c.member_model, "gpt-4o-mini");
        assert_eq!(c.leader_model, "o4-mini");
        assert_eq!(c.context_chars, 8000);
        assert!(c.add_datetime_to_context);
        assert!(c.temperature.is_none());
    }

    #[test]
    fn default_layout_fits_44_lines() {
        assert_eq!(PageLayout::default().lines_per_page(), 44);
    }

    #[test]
    fn builder_clamps_temperature() {
        let c = AnalysisConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(c.temperature, Some(2.0));
    }

    #[test]
    fn builder_rejects_zero_context() {
        let err = AnalysisConfig::builder().context_chars(0).build().unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_layout_without_room() {
        let layout = PageLayout {
            top: 50.0,
            bottom_margin: 40.0,
            ..PageLayout::default()
        };
        let err = AnalysisConfig::builder().layout(layout).build().unwrap_err();
        assert!(err.to_string().contains("no line"));
    }
}
