use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::analytics_model::{AdvancedMetrics, PortfolioAnalytics, RiskLevel};
use super::metrics::{
    calculate_diversification_score, calculate_max_drawdown, calculate_risk_score,
    calculate_sharpe_ratio, calculate_volatility, generate_daily_returns,
    value_series_from_returns,
};
use crate::errors::Result;
use crate::portfolio::holdings::{HoldingsServiceTrait, PortfolioSummary, PricedHolding};
use crate::subscriptions::SubscriptionServiceTrait;

/// Starting value of the synthetic path used for drawdown.
const DRAWDOWN_BASE_VALUE: Decimal = Decimal::ONE_HUNDRED;

/// Computes analytics for an already-priced portfolio.
pub fn analyze_portfolio(
    holdings: &[PricedHolding],
    as_of: NaiveDate,
    include_advanced: bool,
) -> PortfolioAnalytics {
    let summary = PortfolioSummary::from_priced(holdings);
    let diversification_score = calculate_diversification_score(holdings);

    let advanced = include_advanced.then(|| {
        let returns = generate_daily_returns(holdings, as_of);
        let volatility = calculate_volatility(&returns);
        let max_drawdown =
            calculate_max_drawdown(&value_series_from_returns(&returns, DRAWDOWN_BASE_VALUE));
        let risk_score = calculate_risk_score(volatility, max_drawdown);
        AdvancedMetrics {
            sharpe_ratio: calculate_sharpe_ratio(&returns),
            volatility,
            max_drawdown,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
        }
    });

    PortfolioAnalytics {
        summary,
        diversification_score,
        advanced,
    }
}

#[async_trait]
pub trait AnalyticsServiceTrait: Send + Sync {
    async fn get_analytics(&self, user_id: &str) -> Result<PortfolioAnalytics>;
}

pub struct AnalyticsService {
    holdings_service: Arc<dyn HoldingsServiceTrait>,
    subscription_service: Arc<dyn SubscriptionServiceTrait>,
}

impl AnalyticsService {
    pub fn new(
        holdings_service: Arc<dyn HoldingsServiceTrait>,
        subscription_service: Arc<dyn SubscriptionServiceTrait>,
    ) -> Self {
        Self {
            holdings_service,
            subscription_service,
        }
    }
}

#[async_trait]
impl AnalyticsServiceTrait for AnalyticsService {
    async fn get_analytics(&self, user_id: &str) -> Result<PortfolioAnalytics> {
        let valuation = self.holdings_service.get_portfolio(user_id).await?;
        let is_pro = match self.subscription_service.is_pro(user_id) {
            Ok(is_pro) => is_pro,
            Err(e) => {
                warn!("Subscription lookup failed for user {}: {}", user_id, e);
                false
            }
        };
        debug!(
            "Computing analytics for user {} (pro: {}, holdings: {})",
            user_id,
            is_pro,
            valuation.holdings.len()
        );
        Ok(analyze_portfolio(
            &valuation.holdings,
            Utc::now().date_naive(),
            is_pro,
        ))
    }
}
