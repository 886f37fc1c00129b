//! CoinGecko provider for cryptocurrency prices.
//!
//! Uses the public `simple/price` endpoint, one coin id per request:
//!
//! ```text
//! GET {base}/simple/price?ids=bitcoin&vs_currencies=usd&include_24hr_change=true
//! -> {"bitcoin":{"usd":67187.34,"usd_24h_change":3.63}}
//! ```
//!
//! An API key is optional; when present it is sent as `x-cg-demo-api-key`.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::CoinQuote;
use crate::provider::{PriceProvider, RateLimit, RateLimiter};

/// Provider ID constant
const PROVIDER_ID: &str = "COINGECKO";

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct SimplePrice {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

/// CoinGecko price provider.
///
/// # Example
///
/// ```ignore
/// use coinfolio_market_data::CoinGeckoProvider;
///
/// let provider = CoinGeckoProvider::new(None);
/// let quote = provider.get_usd_quote("bitcoin").await?;
/// ```
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    limiter: RateLimiter,
}

impl CoinGeckoProvider {
    /// Create a provider against the public API.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            limiter: RateLimiter::new(PROVIDER_ID, &Self::rate_limit()),
        }
    }

    /// Free tier allows roughly 30 calls per minute.
    pub fn rate_limit() -> RateLimit {
        RateLimit {
            requests_per_minute: 30,
            burst: 5,
        }
    }

    /// `simple/price` request for one coin. Query values are percent-encoded.
    fn price_request(&self, coin_id: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}/simple/price", self.base_url))
            .query(&[
                ("ids", coin_id),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
            ]);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        request
    }

    fn to_decimal(value: f64, what: &str) -> Result<Decimal, MarketDataError> {
        Decimal::try_from(value).map_err(|_| MarketDataError::ValidationFailed {
            message: format!("Failed to convert {} '{}' to decimal", what, value),
        })
    }

    /// Parse a `simple/price` body for one coin id.
    fn parse_price_body(coin_id: &str, body: &str) -> Result<CoinQuote, MarketDataError> {
        let prices: HashMap<String, SimplePrice> = serde_json::from_str(body)
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;

        let entry = prices
            .get(coin_id)
            .ok_or_else(|| MarketDataError::SymbolNotFound(coin_id.to_string()))?;
        let usd = entry
            .usd
            .ok_or_else(|| MarketDataError::SymbolNotFound(coin_id.to_string()))?;

        if usd < 0.0 {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Negative price for {}", coin_id),
            });
        }

        let price = Self::to_decimal(usd, "price")?;
        let change = entry
            .usd_24h_change
            .map(|c| Self::to_decimal(c, "24h change"))
            .transpose()?;

        Ok(CoinQuote::new(coin_id, price, PROVIDER_ID).with_24h_change(change))
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_usd_quote(&self, coin_id: &str) -> Result<CoinQuote, MarketDataError> {
        let coin_id = coin_id.trim();
        if coin_id.is_empty() {
            return Err(MarketDataError::SymbolNotFound(String::new()));
        }

        self.limiter.acquire().await;

        let response = self.price_request(coin_id).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }
        if !status.is_success() {
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                format!("HTTP {} for {}", status.as_u16(), coin_id),
            ));
        }

        let body = response.text().await?;
        debug!("CoinGecko response for {}: {}", coin_id, body);
        Self::parse_price_body(coin_id, &body)
    }
}
