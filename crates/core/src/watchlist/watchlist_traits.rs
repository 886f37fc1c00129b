use async_trait::async_trait;

use super::watchlist_model::{NewWatchlistItem, WatchlistItem, WatchlistQuote};
use crate::errors::Result;

/// Trait for watchlist repository operations
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    fn list_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistItem>>;
    /// Returns the existing entry when the coin is already on the list.
    async fn add_watchlist_item(&self, user_id: &str, item: NewWatchlistItem)
        -> Result<WatchlistItem>;
    async fn remove_watchlist_item(&self, user_id: &str, coin_id: &str) -> Result<usize>;
}

/// Trait for watchlist service operations
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    fn get_watchlist(&self, user_id: &str) -> Result<Vec<WatchlistItem>>;
    async fn add_to_watchlist(&self, user_id: &str, item: NewWatchlistItem)
        -> Result<WatchlistItem>;
    async fn remove_from_watchlist(&self, user_id: &str, coin_id: &str) -> Result<()>;
    async fn get_watchlist_quotes(&self, user_id: &str) -> Result<Vec<WatchlistQuote>>;
}
