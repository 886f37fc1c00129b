use async_trait::async_trait;

use super::holdings_model::{Holding, NewHolding, PortfolioValuation};
use crate::errors::Result;

/// Trait for holding repository operations
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn list_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;
    async fn insert_holding(&self, user_id: &str, new_holding: NewHolding) -> Result<Holding>;
    async fn delete_holding(&self, user_id: &str, holding_id: &str) -> Result<usize>;
}

/// Trait for holdings service operations
#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    fn get_holdings(&self, user_id: &str) -> Result<Vec<Holding>>;
    async fn add_holding(&self, user_id: &str, new_holding: NewHolding) -> Result<Holding>;
    async fn remove_holding(&self, user_id: &str, holding_id: &str) -> Result<()>;
    /// Values every holding at the latest price.
    async fn get_portfolio(&self, user_id: &str) -> Result<PortfolioValuation>;
}
