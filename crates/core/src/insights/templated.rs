use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::insights_model::{Insight, InsightContext, InsightGenerator};
use crate::errors::Result;
use crate::utils::format::{format_percent, format_usd};

const WELL_DIVERSIFIED: Decimal = dec!(60);
const CONCENTRATED: Decimal = dec!(30);

/// Deterministic insight built from portfolio numbers alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplatedInsightGenerator;

impl TemplatedInsightGenerator {
    pub fn summarize(context: &InsightContext) -> Insight {
        let summary = &context.summary;
        let direction = if summary.total_profit_loss_percent.is_sign_negative()
            && !summary.total_profit_loss_percent.is_zero()
        {
            "down"
        } else {
            "up"
        };
        let summary_text = format!(
            "Your portfolio of {} holding{} is worth {}, {} {} since purchase.",
            summary.holdings_count,
            if summary.holdings_count == 1 { "" } else { "s" },
            format_usd(summary.total_value),
            direction,
            format_percent(summary.total_profit_loss_percent.abs())
                .trim_start_matches('+'),
        );

        let mut trends: Vec<String> = context
            .top_movers
            .iter()
            .map(|m| {
                format!(
                    "{} ({}) moved {} since purchase",
                    m.coin_name,
                    m.coin_symbol,
                    format_percent(m.profit_loss_percent)
                )
            })
            .collect();

        let score = context.diversification_score.round_dp(0);
        trends.push(if context.diversification_score >= WELL_DIVERSIFIED {
            format!("Diversification score {}/100: well spread across coins", score)
        } else if context.diversification_score < CONCENTRATED {
            format!(
                "Diversification score {}/100: concentrated in few coins",
                score
            )
        } else {
            format!("Diversification score {}/100: moderately spread", score)
        });

        if let Some(level) = context.risk_level {
            trends.push(format!("Risk level: {}", level.label()));
        }

        Insight::ProSummary {
            summary: summary_text,
            trends,
        }
    }
}

#[async_trait]
impl InsightGenerator for TemplatedInsightGenerator {
    fn id(&self) -> &'static str {
        "TEMPLATED"
    }

    async fn generate(&self, context: &InsightContext) -> Result<Insight> {
        Ok(Self::summarize(context))
    }
}
