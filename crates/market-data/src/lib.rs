//! Coinfolio Market Data Crate
//!
//! This crate fetches cryptocurrency prices for the Coinfolio backend.
//!
//! # Overview
//!
//! - [`PriceProvider`] - provider-agnostic trait for latest USD quotes
//! - [`CoinGeckoProvider`] - CoinGecko `simple/price` implementation
//! - [`PriceCache`] - injectable cache abstraction with per-entry TTL
//! - [`RateLimiter`] - token bucket guarding outbound provider calls
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |   Domain Layer   | --> |   PriceCache     |  (hit: return cached quote)
//! +------------------+     +------------------+
//!                                  | miss
//!                                  v
//!                          +------------------+
//!                          |  PriceProvider   |  (CoinGecko, mocks in tests)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    CoinQuote     |  (USD price + 24h change)
//!                          +------------------+
//! ```

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;

pub use cache::{InMemoryPriceCache, NoopPriceCache, PriceCache, DEFAULT_PRICE_TTL};
pub use errors::MarketDataError;
pub use models::{CoinId, CoinQuote};
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::{PriceProvider, RateLimit, RateLimiter};
