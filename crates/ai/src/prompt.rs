//! Prompt construction and response parsing.

use rust_decimal::Decimal;
use serde::Deserialize;

use coinfolio_core::insights::{Insight, InsightContext};

use crate::error::AiError;

/// Trends kept from a model answer.
const MAX_TRENDS: usize = 5;

pub(crate) const SYSTEM_PROMPT: &str = "You are a concise crypto portfolio analyst. \
Answer ONLY with a JSON object of the form {\"summary\": string, \"trends\": [string]}. \
The summary is at most two sentences. Give at most five trends, each under 20 words. \
Do not give financial advice.";

fn fmt_amount(value: Decimal) -> String {
    value.round_dp(2).to_string()
}

pub(crate) fn build_user_prompt(context: &InsightContext) -> String {
    let summary = &context.summary;
    let mut prompt = format!(
        "Portfolio: {} holdings, value {} USD, cost {} USD, profit/loss {} USD ({}%).\n\
Diversification score: {}/100.\n",
        summary.holdings_count,
        fmt_amount(summary.total_value),
        fmt_amount(summary.total_cost),
        fmt_amount(summary.total_profit_loss),
        fmt_amount(summary.total_profit_loss_percent),
        fmt_amount(context.diversification_score),
    );
    if let Some(level) = context.risk_level {
        prompt.push_str(&format!("Risk level: {}.\n", level.label()));
    }
    if !context.top_movers.is_empty() {
        prompt.push_str("Largest moves since purchase:\n");
        for mover in &context.top_movers {
            prompt.push_str(&format!(
                "- {} ({}): {}%, value {} USD\n",
                mover.coin_name,
                mover.coin_symbol,
                fmt_amount(mover.profit_loss_percent),
                fmt_amount(mover.current_value)
            ));
        }
    }
    prompt
}

#[derive(Deserialize)]
struct ModelInsight {
    summary: String,
    #[serde(default)]
    trends: Vec<String>,
}

/// Strips a surrounding markdown code fence, if any.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

pub(crate) fn parse_insight(content: &str) -> Result<Insight, AiError> {
    let parsed: ModelInsight = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AiError::invalid_response(format!("{}: {}", e, content)))?;

    let summary = parsed.summary.trim().to_string();
    if summary.is_empty() {
        return Err(AiError::invalid_response("empty summary"));
    }
    let trends = parsed
        .trends
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .take(MAX_TRENDS)
        .collect();

    Ok(Insight::ProSummary { summary, trends })
}
