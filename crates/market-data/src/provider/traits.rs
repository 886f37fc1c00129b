//! Price provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::CoinQuote;

/// Trait for price providers.
///
/// Implement this trait to add support for a new price source. Callers in
/// `coinfolio-core` only ever see this trait, so tests swap in mocks.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "COINGECKO".
    fn id(&self) -> &'static str;

    /// Fetch the latest USD quote for a single coin id.
    async fn get_usd_quote(&self, coin_id: &str) -> Result<CoinQuote, MarketDataError>;
}
