//! Prompts for the finance team.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing how an agent writes (a new
//!    section, a different tone) means editing exactly one constant.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    spinning up a real LLM, making prompt regressions easy to catch.
//!
//! The task prompt is built by [`build_analysis_prompt`]; the per-agent
//! instructions become each agent's system message in [`crate::team`].

/// Opening of every task prompt. The extracted document text follows it.
pub const ANALYSIS_TASK_PREAMBLE: &str = "You are a collaborative financial analysis team (Data Analyst, Risk Evaluator, Market Strategist).
Analyze the following document and produce a structured report including:
- Financial summary
- Risks & mitigations
- Actionable strategic recommendations

File Context:
";

/// Instructions for the Data Analyst member.
pub const DATA_ANALYST_INSTRUCTIONS: &str = "You are an expert financial data analyst responsible for examining company and market data.

Your core responsibilities:
1. Analyze financial statements (income, balance sheet, cash flow)
2. Identify revenue trends, cost structures, and profitability ratios
3. Highlight anomalies or unusual spikes in metrics
4. Present Key Performance Indicators (KPIs) in a concise summary
5. Compute YoY and QoQ growth where possible

Your style guide:
- Use clean Markdown tables for numbers
- Highlight trends with arrows
- Include short comments beside each key metric
- Use bullet points for insights
- End with a 'Summary of Financial Health' section";

/// Instructions for the Risk Evaluator member.
pub const RISK_EVALUATOR_INSTRUCTIONS: &str = "You are a risk management expert. Your job is to assess company-level and macroeconomic risks.

Your core responsibilities:
1. Evaluate liquidity, leverage, and cash flow stability
2. Assess exposure to market, credit, and operational risks
3. Identify potential red flags from the data analyst's findings
4. Estimate risk severity (Low / Moderate / High)
5. Recommend mitigation strategies

Your style guide:
- Present risk factors in a structured table
- Keep tone formal and data-driven
- Conclude with 'Top 3 Risks' and mitigation recommendations";

/// Instructions for the Market Strategist member.
pub const MARKET_STRATEGIST_INSTRUCTIONS: &str = "You are a senior market strategist providing actionable insights for investors.

Your core responsibilities:
1. Use insights from both the Data Analyst and Risk Evaluator
2. Formulate investment or strategic recommendations
3. Identify sectors or opportunities for growth
4. Highlight long-term vs short-term outlooks
5. Provide a concluding 'Strategic Summary' section

Your style guide:
- Start with a concise 'Market Overview'
- Provide 2-3 actionable investment insights
- Use clear headers for each strategic area
- End with 'Final Recommendations' and bullet points
- Maintain a confident, advisor-like tone";

/// Description of the team, placed at the top of the leader's system message.
pub const TEAM_DESCRIPTION: &str = "A collaborative multi-agent system for financial analysis, risk evaluation, and market strategy.";

/// Instructions for the team leader, whose answer is the final report.
pub const LEADER_INSTRUCTIONS: &str = "You are the lead editor and coordinator of a financial intelligence desk!

Your responsibilities:
1. Coordinate between the Data Analyst, Risk Evaluator, and Market Strategist
2. Combine their findings into a single cohesive report
3. Maintain consistent tone, structure, and formatting
4. Validate all numerical data and logical reasoning
5. Provide a balanced view of financial health and outlook

Your style guide:
- Begin with an 'Executive Summary'
- Use clear section headers: Financial Analysis | Risk Assessment | Market Strategy
- Present key data and insights in tables and bullet points
- Add a 'Key Takeaways' section at the end
- Finish with a short 'Conclusion' paragraph signed off as 'Finance Analysis Team' with today's date
- Maintain formal, analytical language";

/// Appended to every system message: all agents answer in Markdown.
pub const MARKDOWN_HINT: &str = "Use markdown to format your answers.";

/// Return the longest prefix of `text` holding at most `max_chars` characters.
///
/// Counts Unicode scalar values, never splitting one.
pub fn truncate_context(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the task prompt handed to the team.
///
/// Only the first `max_chars` characters of `document_text` are included.
pub fn build_analysis_prompt(document_text: &str, max_chars: usize) -> String {
    format!(
        "{}{}",
        ANALYSIS_TASK_PREAMBLE,
        truncate_context(document_text, max_chars)
    )
    .trim()
    .to_string()
}

/// Build a member agent's system message.
pub fn member_system_prompt(name: &str, role: &str, instructions: &str) -> String {
    format!(
        "Your name is {name}.\nYour role: {role}\n\n<instructions>\n{instructions}\n</instructions>\n\n{MARKDOWN_HINT}"
    )
}

/// Build the leader's system message, with the current date and time when
/// `datetime` is given.
pub fn leader_system_prompt(name: &str, datetime: Option<&str>) -> String {
    let mut prompt = format!(
        "Your name is {name}.\n{TEAM_DESCRIPTION}\n\n<instructions>\n{LEADER_INSTRUCTIONS}\n</instructions>\n\n{MARKDOWN_HINT}"
    );
    if let Some(now) = datetime {
        prompt.push_str(&format!("\n\nThe current time is {now}."));
    }
    prompt
}

/// Wrap the responses of earlier members so the next agent can build on them.
///
/// `responses` is `(agent name, content)` in run order.
pub fn team_context(responses: &[(&str, &str)]) -> String {
    let mut out = String::from("Responses from your team members so far:\n");
    for (name, content) in responses {
        out.push_str(&format!(
            "\n<member name=\"{name}\">\n{}\n</member>\n",
            content.trim()
        ));
    }
    out
}
