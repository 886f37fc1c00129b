use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;

use super::insights_model::{Insight, InsightContext, InsightGenerator};
use super::templated::TemplatedInsightGenerator;
use crate::errors::Result;
use crate::portfolio::holdings::HoldingsServiceTrait;
use crate::subscriptions::SubscriptionServiceTrait;

#[async_trait]
pub trait InsightServiceTrait: Send + Sync {
    async fn get_insight(&self, user_id: &str) -> Result<Insight>;
}

/// Pro users get a generated summary, everyone else the upsell block.
///
/// When the configured generator fails the templated summary is returned
/// instead, so an unreachable model never breaks the endpoint.
pub struct InsightService {
    generator: Arc<dyn InsightGenerator>,
    holdings_service: Arc<dyn HoldingsServiceTrait>,
    subscription_service: Arc<dyn SubscriptionServiceTrait>,
}

impl InsightService {
    pub fn new(
        generator: Arc<dyn InsightGenerator>,
        holdings_service: Arc<dyn HoldingsServiceTrait>,
        subscription_service: Arc<dyn SubscriptionServiceTrait>,
    ) -> Self {
        Self {
            generator,
            holdings_service,
            subscription_service,
        }
    }
}

#[async_trait]
impl InsightServiceTrait for InsightService {
    async fn get_insight(&self, user_id: &str) -> Result<Insight> {
        let is_pro = match self.subscription_service.is_pro(user_id) {
            Ok(is_pro) => is_pro,
            Err(e) => {
                warn!("Subscription lookup failed for user {}: {}", user_id, e);
                false
            }
        };
        if !is_pro {
            return Ok(Insight::Basic);
        }

        let valuation = self.holdings_service.get_portfolio(user_id).await?;
        let context = InsightContext::from_priced(&valuation.holdings, Utc::now().date_naive());

        match self.generator.generate(&context).await {
            Ok(insight) => {
                debug!("Insight for user {} from {}", user_id, self.generator.id());
                Ok(insight)
            }
            Err(e) => {
                warn!(
                    "Insight generator {} failed for user {}: {}. Using templated summary.",
                    self.generator.id(),
                    user_id,
                    e
                );
                Ok(TemplatedInsightGenerator::summarize(&context))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::portfolio::holdings::{Holding, NewHolding, PortfolioValuation};
    use crate::subscriptions::Subscription;

    struct EmptyHoldings;

    #[async_trait]
    impl HoldingsServiceTrait for EmptyHoldings {
        fn get_holdings(&self, _user_id: &str) -> Result<Vec<Holding>> {
            Ok(Vec::new())
        }
        async fn add_holding(&self, _user_id: &str, _h: NewHolding) -> Result<Holding> {
            unimplemented!()
        }
        async fn remove_holding(&self, _user_id: &str, _id: &str) -> Result<()> {
            unimplemented!()
        }
        async fn get_portfolio(&self, _user_id: &str) -> Result<PortfolioValuation> {
            Ok(PortfolioValuation::new(Vec::new()))
        }
    }

    struct FixedPlan(bool);

    impl SubscriptionServiceTrait for FixedPlan {
        fn get_subscription(&self, _user_id: &str) -> Result<Option<Subscription>> {
            Ok(None)
        }
        fn is_pro(&self, _user_id: &str) -> Result<bool> {
            Ok(self.0)
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl InsightGenerator for FailingGenerator {
        fn id(&self) -> &'static str {
            "FAILING"
        }
        async fn generate(&self, _context: &InsightContext) -> Result<Insight> {
            Err(Error::Insight("model unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_free_user_gets_basic() {
        let service = InsightService::new(
            Arc::new(FailingGenerator),
            Arc::new(EmptyHoldings),
            Arc::new(FixedPlan(false)),
        );
        assert_eq!(service.get_insight("u1").await.unwrap(), Insight::Basic);
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back_to_template() {
        let service = InsightService::new(
            Arc::new(FailingGenerator),
            Arc::new(EmptyHoldings),
            Arc::new(FixedPlan(true)),
        );
        match service.get_insight("u1").await.unwrap() {
            Insight::ProSummary { summary, .. } => {
                assert!(summary.contains("0 holdings"));
            }
            other => panic!("unexpected insight {:?}", other),
        }
    }
}
