use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest USD quote for a coin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuote {
    /// CoinGecko coin id
    pub coin_id: String,

    /// Current USD price
    pub usd: Decimal,

    /// Rolling 24h change in percent, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_24h_change: Option<Decimal>,

    /// When the quote was fetched
    pub fetched_at: DateTime<Utc>,

    /// Source of the quote (COINGECKO, MANUAL, ...)
    pub source: String,
}

impl CoinQuote {
    /// Create a quote with only the required fields.
    pub fn new(coin_id: impl Into<String>, usd: Decimal, source: impl Into<String>) -> Self {
        Self {
            coin_id: coin_id.into(),
            usd,
            usd_24h_change: None,
            fetched_at: Utc::now(),
            source: source.into(),
        }
    }

    pub fn with_24h_change(mut self, change: Option<Decimal>) -> Self {
        self.usd_24h_change = change;
        self
    }
}
