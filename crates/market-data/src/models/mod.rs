mod quote;

pub use quote::CoinQuote;

/// CoinGecko coin identifier (e.g. "bitcoin", "ethereum").
pub type CoinId = String;
