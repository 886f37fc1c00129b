use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use coinfolio_market_data::{CoinQuote, PriceCache, PriceProvider};

use crate::errors::Result;

/// Latest-quote lookups through an injected cache.
///
/// The cache is consulted first; misses go to the provider and successful
/// quotes are stored for `ttl`. Failures are never cached.
pub struct PriceService {
    provider: Arc<dyn PriceProvider>,
    cache: Arc<dyn PriceCache>,
    ttl: Duration,
}

impl PriceService {
    pub fn new(provider: Arc<dyn PriceProvider>, cache: Arc<dyn PriceCache>, ttl: Duration) -> Self {
        Self {
            provider,
            cache,
            ttl,
        }
    }

    pub async fn get_quote(&self, coin_id: &str) -> Result<CoinQuote> {
        if let Some(quote) = self.cache.get(coin_id) {
            return Ok(quote);
        }
        let quote = self.provider.get_usd_quote(coin_id).await?;
        self.cache.set(coin_id, quote.clone(), self.ttl);
        Ok(quote)
    }

    /// Quotes for each distinct coin id; a failed coin maps to `None`.
    pub async fn get_quotes(&self, coin_ids: &[String]) -> HashMap<String, Option<CoinQuote>> {
        let unique: BTreeSet<&str> = coin_ids.iter().map(String::as_str).collect();
        let mut quotes = HashMap::with_capacity(unique.len());

        for coin_id in unique {
            let quote = match self.get_quote(coin_id).await {
                Ok(quote) => Some(quote),
                Err(e) => {
                    warn!(
                        "Price fetch via {} failed for {}: {}",
                        self.provider.id(),
                        coin_id,
                        e
                    );
                    None
                }
            };
            quotes.insert(coin_id.to_string(), quote);
        }
        quotes
    }

    /// USD price per distinct coin id. A coin whose fetch fails is priced at zero.
    pub async fn get_prices_or_zero(&self, coin_ids: &[String]) -> HashMap<String, Decimal> {
        let prices: HashMap<String, Decimal> = self
            .get_quotes(coin_ids)
            .await
            .into_iter()
            .map(|(coin_id, quote)| (coin_id, quote.map(|q| q.usd).unwrap_or(Decimal::ZERO)))
            .collect();
        debug!("Resolved {} prices", prices.len());
        prices
    }
}
