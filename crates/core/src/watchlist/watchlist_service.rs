use async_trait::async_trait;
use std::sync::Arc;

use super::watchlist_model::{NewWatchlistItem, WatchlistItem, WatchlistQuote};
use super::watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
use crate::errors::{Error, Result};
use crate::prices::PriceService;

pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
    price_service: Arc<PriceService>,
}

impl WatchlistService {
    pub fn new(
        repository: Arc<dyn WatchlistRepositoryTrait>,
        price_service: Arc<PriceService>,
    ) -> Self {
        Self {
            repository,
            price_service,
        }
    }
}

#[async_trait]
impl WatchlistServiceTrait for WatchlistService {
    fn get_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistItem>> {
        self.repository.list_watchlist(user_id)
    }

    async fn add_to_watchlist(
        &self,
        user_id: &str,
        item: NewWatchlistItem,
    ) -> Result<WatchlistItem> {
        item.validate()?;
        self.repository
            .add_watchlist_item(user_id, item.normalized())
            .await
    }

    async fn remove_from_watchlist(&self, user_id: &str, coin_id: &str) -> Result<()> {
        let coin_id = coin_id.trim().to_lowercase();
        let removed = self
            .repository
            .remove_watchlist_item(user_id, &coin_id)
            .await?;
        if removed == 0 {
            return Err(Error::NotFound(format!("Watchlist coin {}", coin_id)));
        }
        Ok(())
    }

    async fn get_watchlist_quotes(&self, user_id: &str) -> Result<Vec<WatchlistQuote>> {
        let items = self.repository.list_watchlist(user_id)?;
        let coin_ids: Vec<String> = items.iter().map(|i| i.coin_id.clone()).collect();
        let quotes = self.price_service.get_quotes(&coin_ids).await;

        Ok(items
            .into_iter()
            .map(|item| {
                let quote = quotes.get(&item.coin_id).cloned().flatten();
                WatchlistQuote {
                    price: quote.as_ref().map(|q| q.usd),
                    change_24h: quote.and_then(|q| q.usd_24h_change),
                    item,
                }
            })
            .collect())
    }
}
