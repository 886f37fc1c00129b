//! Price provider abstractions and implementations.
//!
//! This module contains:
//! - The `PriceProvider` trait that all providers implement
//! - Rate limiting configuration and a token bucket limiter
//! - The CoinGecko provider

mod capabilities;
mod rate_limiter;
mod traits;

pub mod coingecko;

pub use capabilities::RateLimit;
pub use rate_limiter::RateLimiter;
pub use traits::PriceProvider;
