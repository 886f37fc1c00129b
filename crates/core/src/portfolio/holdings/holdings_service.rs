use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use std::sync::Arc;

use super::holdings_model::{price_holdings, Holding, NewHolding, PortfolioValuation};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
use crate::errors::{Error, Result};
use crate::prices::PriceService;

pub struct HoldingsService {
    repository: Arc<dyn HoldingRepositoryTrait>,
    price_service: Arc<PriceService>,
}

impl HoldingsService {
    pub fn new(
        repository: Arc<dyn HoldingRepositoryTrait>,
        price_service: Arc<PriceService>,
    ) -> Self {
        Self {
            repository,
            price_service,
        }
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>> {
        self.repository.list_holdings(user_id)
    }

    async fn add_holding(&self, user_id: &str, new_holding: NewHolding) -> Result<Holding> {
        new_holding.validate(Utc::now().date_naive())?;
        let mut new_holding = new_holding;
        new_holding.coin_id = new_holding.coin_id.trim().to_lowercase();
        new_holding.coin_symbol = new_holding.coin_symbol.trim().to_uppercase();
        new_holding.coin_name = new_holding.coin_name.trim().to_string();
        self.repository.insert_holding(user_id, new_holding).await
    }

    async fn remove_holding(&self, user_id: &str, holding_id: &str) -> Result<()> {
        let deleted = self.repository.delete_holding(user_id, holding_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Holding {}", holding_id)));
        }
        Ok(())
    }

    async fn get_portfolio(&self, user_id: &str) -> Result<PortfolioValuation> {
        let holdings = self.repository.list_holdings(user_id)?;
        let coin_ids: Vec<String> = holdings.iter().map(|h| h.coin_id.clone()).collect();
        let prices = self.price_service.get_prices_or_zero(&coin_ids).await;
        debug!(
            "Valued {} holdings for user {} with {} prices",
            holdings.len(),
            user_id,
            prices.len()
        );
        Ok(PortfolioValuation::new(price_holdings(holdings, &prices)))
    }
}
