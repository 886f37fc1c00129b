use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::portfolio::holdings::PortfolioSummary;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: Decimal) -> Self {
        if score < dec!(33) {
            RiskLevel::Low
        } else if score < dec!(66) {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

/// Metrics only computed for paying users.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedMetrics {
    pub sharpe_ratio: Decimal,
    /// Annualized, percent.
    pub volatility: Decimal,
    /// Percent.
    pub max_drawdown: Decimal,
    pub risk_score: Decimal,
    pub risk_level: RiskLevel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalytics {
    pub summary: PortfolioSummary,
    pub diversification_score: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedMetrics>,
}
