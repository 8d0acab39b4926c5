//! The multi-agent finance team that turns a task prompt into a report.
//!
//! ## Flow
//!
//! ```text
//! prompt ──▶ Data Analyst ──▶ Risk Evaluator ──▶ Market Strategist ──▶ Leader
//!               │                  │                    │                │
//!               └──── responses ───┴──── so far ────────┘          final report
//! ```
//!
//! Members run one after another. Each receives the task prompt plus the
//! answers of the members before it, so the strategist can build on the
//! analyst and the risk evaluator. The leader then receives every member
//! answer (and today's date) and writes the report.
//!
//! Everything outside this module only sees [`ReportOrchestrator`]; swap in
//! another implementation via
//! [`crate::config::AnalysisConfigBuilder::orchestrator`].

use crate::config::AnalysisConfig;
use crate::error::ReportError;
use crate::pipeline::llm::{AgentReply, AgentRequest, ChatBackend, ProviderBackend};
use crate::progress::ProgressCallback;
use crate::prompts;
use async_trait::async_trait;
use edgequake_llm::{LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Name of the coordinating leader.
pub const LEADER_NAME: &str = "Finance Analysis Team";

/// Produces a report from a task prompt.
#[async_trait]
pub trait ReportOrchestrator: Send + Sync {
    async fn run(&self, prompt: &str) -> Result<TeamResponse, ReportError>;
}

/// One member's contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub agent: String,
    pub content: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub duration_ms: u64,
}

/// Result of a full team run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamResponse {
    /// The leader's answer: the report.
    pub content: String,
    /// Member answers in run order.
    pub member_responses: Vec<MemberResponse>,
    /// Tokens across all agents, leader included.
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Name, role and instructions of one member agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRole {
    pub name: String,
    pub role: String,
    pub instructions: String,
}

impl AgentRole {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            instructions: instructions.into(),
        }
    }

    pub fn data_analyst() -> Self {
        Self::new(
            "Data Analyst Agent",
            "Analyze structured and unstructured financial data",
            prompts::DATA_ANALYST_INSTRUCTIONS,
        )
    }

    pub fn risk_evaluator() -> Self {
        Self::new(
            "Risk Evaluator Agent",
            "Evaluate financial and operational risks",
            prompts::RISK_EVALUATOR_INSTRUCTIONS,
        )
    }

    pub fn market_strategist() -> Self {
        Self::new(
            "Market Strategist Agent",
            "Develop strategic recommendations and investment insights",
            prompts::MARKET_STRATEGIST_INSTRUCTIONS,
        )
    }

    /// The three stock members, in run order.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::data_analyst(),
            Self::risk_evaluator(),
            Self::market_strategist(),
        ]
    }
}

/// The built-in [`ReportOrchestrator`]: three members and a leader.
pub struct FinanceTeam {
    members: Vec<AgentRole>,
    member_backend: Arc<dyn ChatBackend>,
    leader_backend: Arc<dyn ChatBackend>,
    add_datetime_to_context: bool,
    progress: Option<ProgressCallback>,
}

impl FinanceTeam {
    /// A team with the stock members talking to the given backends.
    pub fn new(member_backend: Arc<dyn ChatBackend>, leader_backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            members: AgentRole::defaults(),
            member_backend,
            leader_backend,
            add_datetime_to_context: true,
            progress: None,
        }
    }

    /// Build the team from config, resolving one provider for the members
    /// and one for the leader.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ReportError> {
        let member_provider = resolve_provider(config, &config.member_model)?;
        let leader_provider = resolve_provider(config, &config.leader_model)?;
        info!(
            "Finance team: members on {}, leader on {}",
            config.member_model, config.leader_model
        );

        let mut team = Self::new(
            Arc::new(ProviderBackend::new(member_provider, config)),
            Arc::new(ProviderBackend::new(leader_provider, config)),
        )
        .add_datetime_to_context(config.add_datetime_to_context);
        team.progress = config.progress_callback.clone();
        Ok(team)
    }

    pub fn with_members(mut self, members: Vec<AgentRole>) -> Self {
        self.members = members;
        self
    }

    pub fn add_datetime_to_context(mut self, v: bool) -> Self {
        self.add_datetime_to_context = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress = Some(cb);
        self
    }

    pub fn members(&self) -> &[AgentRole] {
        &self.members
    }

    async fn ask(
        &self,
        backend: &dyn ChatBackend,
        request: AgentRequest<'_>,
        step: usize,
        total_steps: usize,
    ) -> Result<AgentReply, ReportError> {
        let agent = request.agent.to_string();
        if let Some(ref cb) = self.progress {
            cb.on_agent_start(&agent, step, total_steps);
        }
        info!("Running {} ({}/{})", agent, step, total_steps);

        let reply = backend.complete(request).await?;
        if reply.content.trim().is_empty() {
            warn!("{} returned an empty answer", agent);
        }

        if let Some(ref cb) = self.progress {
            cb.on_agent_complete(&agent, step, total_steps, reply.content.len());
        }
        Ok(reply)
    }
}

#[async_trait]
impl ReportOrchestrator for FinanceTeam {
    async fn run(&self, prompt: &str) -> Result<TeamResponse, ReportError> {
        let total_steps = self.members.len() + 1;
        let mut member_responses: Vec<MemberResponse> = Vec::with_capacity(self.members.len());

        for (i, member) in self.members.iter().enumerate() {
            let mut system = vec![prompts::member_system_prompt(
                &member.name,
                &member.role,
                &member.instructions,
            )];
            if !member_responses.is_empty() {
                system.push(prompts::team_context(&as_pairs(&member_responses)));
            }

            let request = AgentRequest {
                agent: &member.name,
                system,
                user: prompt,
            };
            let reply = self
                .ask(self.member_backend.as_ref(), request, i + 1, total_steps)
                .await?;

            member_responses.push(MemberResponse {
                agent: member.name.clone(),
                content: reply.content,
                input_tokens: reply.input_tokens,
                output_tokens: reply.output_tokens,
                duration_ms: reply.duration_ms,
            });
        }

        let now = self
            .add_datetime_to_context
            .then(|| chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        let mut system = vec![prompts::leader_system_prompt(LEADER_NAME, now.as_deref())];
        if !member_responses.is_empty() {
            system.push(prompts::team_context(&as_pairs(&member_responses)));
        }
        let request = AgentRequest {
            agent: LEADER_NAME,
            system,
            user: prompt,
        };
        let leader = self
            .ask(self.leader_backend.as_ref(), request, total_steps, total_steps)
            .await?;

        let input_tokens =
            leader.input_tokens + member_responses.iter().map(|m| m.input_tokens).sum::<u64>();
        let output_tokens =
            leader.output_tokens + member_responses.iter().map(|m| m.output_tokens).sum::<u64>();

        Ok(TeamResponse {
            content: leader.content,
            member_responses,
            input_tokens,
            output_tokens,
        })
    }
}

fn as_pairs(responses: &[MemberResponse]) -> Vec<(&str, &str)> {
    responses
        .iter()
        .map(|m| (m.agent.as_str(), m.content.as_str()))
        .collect()
}

// ── Provider resolution ──────────────────────────────────────────────────

/// Instantiate a named provider with the given model.
fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, ReportError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ReportError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider for `model`, from most-specific to least-specific.
///
/// 1. **Pre-built provider** (`config.provider`) — used as-is for every agent.
/// 2. **Named provider** (`config.provider_name`) — created with `model`.
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    both set means the execution environment picked provider and model;
///    the model then applies to every agent.
/// 4. **OpenAI key** (`OPENAI_API_KEY`) — OpenAI with `model`, even when
///    other provider keys are present.
/// 5. **Full auto-detection** (`ProviderFactory::from_env`).
fn resolve_provider(config: &AnalysisConfig, model: &str) -> Result<Arc<dyn LLMProvider>, ReportError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(env_model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !env_model.is_empty() {
            return create_provider(&prov, &env_model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ReportError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
