use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DIGEST_TOP_MOVERS;
use crate::errors::Result;
use crate::portfolio::analytics::{analyze_portfolio, RiskLevel};
use crate::portfolio::holdings::{top_movers, PortfolioSummary, PricedHolding, TopMover};

/// Optional insight attached to a portfolio view.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Insight {
    /// Insights switched off.
    None,
    /// Free plan: an upsell in place of the summary.
    Basic,
    ProSummary {
        summary: String,
        trends: Vec<String>,
    },
}

/// Portfolio facts an insight is generated from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightContext {
    pub summary: PortfolioSummary,
    pub top_movers: Vec<TopMover>,
    pub diversification_score: Decimal,
    pub risk_level: Option<RiskLevel>,
}

impl InsightContext {
    pub fn from_priced(holdings: &[PricedHolding], as_of: NaiveDate) -> Self {
        let analytics = analyze_portfolio(holdings, as_of, true);
        Self {
            summary: analytics.summary,
            top_movers: top_movers(holdings, DIGEST_TOP_MOVERS),
            diversification_score: analytics.diversification_score,
            risk_level: analytics.advanced.map(|a| a.risk_level),
        }
    }
}

/// Produces a `ProSummary` insight for a portfolio.
#[async_trait]
pub trait InsightGenerator: Send + Sync {
    fn id(&self) -> &'static str;
    async fn generate(&self, context: &InsightContext) -> Result<Insight>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_is_tagged() {
        let json = serde_json::to_value(Insight::ProSummary {
            summary: "Up".to_string(),
            trends: vec!["BTC".to_string()],
        })
        .unwrap();
        assert_eq!(json["kind"], "proSummary");
        assert_eq!(json["trends"][0], "BTC");

        let basic = serde_json::to_value(Insight::Basic).unwrap();
        assert_eq!(basic, serde_json::json!({ "kind": "basic" }));
    }
}
