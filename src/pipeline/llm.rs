//! LLM interaction: turn an agent request into a chat completion.
//!
//! This module is intentionally thin — all prompt wording lives in
//! [`crate::prompts`] and all team logic in [`crate::team`], so neither has
//! to know how messages reach the provider.
//!
//! ## No retries
//!
//! A report is one long chain of dependent calls; a failed member leaves the
//! next agent without its input. Any provider error is therefore returned as
//! [`ReportError::LlmApiError`] and aborts the run.

use crate::config::AnalysisConfig;
use crate::error::ReportError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// One call on behalf of a named agent.
///
/// `system` messages are sent in order before the single user turn.
#[derive(Debug, Clone)]
pub struct AgentRequest<'a> {
    pub agent: &'a str,
    pub system: Vec<String>,
    pub user: &'a str,
}

/// What an agent answered, with usage figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentReply {
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Something that can answer an [`AgentRequest`].
///
/// [`ProviderBackend`] is the real implementation; tests substitute a
/// scripted one.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: AgentRequest<'_>) -> Result<AgentReply, ReportError>;
}

/// A [`ChatBackend`] over an `edgequake-llm` provider.
pub struct ProviderBackend {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ProviderBackend {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &AnalysisConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }
}

#[async_trait]
impl ChatBackend for ProviderBackend {
    async fn complete(&self, request: AgentRequest<'_>) -> Result<AgentReply, ReportError> {
        let start = Instant::now();
        let mut messages: Vec<ChatMessage> = request
            .system
            .iter()
            .map(|s| ChatMessage::system(s.as_str()))
            .collect();
        messages.push(ChatMessage::user(request.user));

        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(|e| ReportError::LlmApiError {
                agent: request.agent.to_string(),
                message: e.to_string(),
            })?;

        let duration = start.elapsed();
        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            request.agent, response.prompt_tokens, response.completion_tokens, duration
        );

        Ok(AgentReply {
            content: response.content,
            input_tokens: response.prompt_tokens as u64,
            output_tokens: response.completion_tokens as u64,
            duration_ms: duration.as_millis() as u64,
        })
    }
}

/// Build `CompletionOptions` from the analysis config.
///
/// Unset values stay `None` so the provider applies its own defaults.
fn build_options(config: &AnalysisConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults_to_provider_settings() {
        let opts = build_options(&AnalysisConfig::default());
        assert_eq!(opts.temperature, None);
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn build_options_forwards_overrides() {
        let config = AnalysisConfig::builder()
            .temperature(0.3)
            .max_tokens(2048)
            .build()
            .unwrap();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, Some(2048));
    }
}
