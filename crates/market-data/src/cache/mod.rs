//! Price cache abstraction.
//!
//! Quotes are cached per coin id with an expiry. The cache is injected into
//! the price service as `Arc<dyn PriceCache>` so it can be replaced by a
//! shared cache or disabled entirely ([`NoopPriceCache`]).

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::models::CoinQuote;

/// Default lifetime of a cached quote.
pub const DEFAULT_PRICE_TTL: Duration = Duration::from_secs(60);

/// Expired entries are swept on insert once the map reaches this size.
const SWEEP_THRESHOLD: usize = 1024;

/// Cache for latest quotes, keyed by coin id.
pub trait PriceCache: Send + Sync {
    /// Returns the cached quote if present and not expired.
    fn get(&self, coin_id: &str) -> Option<CoinQuote>;

    /// Stores a quote that expires after `ttl`.
    fn set(&self, coin_id: &str, quote: CoinQuote, ttl: Duration);

    /// Drops the entry for a coin id.
    fn invalidate(&self, coin_id: &str);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    quote: CoinQuote,
    expires_at: Instant,
}

/// Process-local cache.
#[derive(Default)]
pub struct InMemoryPriceCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|poisoned| {
            warn!("Price cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            warn!("Price cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.write().retain(|_, entry| entry.expires_at > now);
    }

    fn sweep_if_large(entries: &mut HashMap<String, CacheEntry>) {
        if entries.len() >= SWEEP_THRESHOLD {
            let now = Instant::now();
            entries.retain(|_, entry| entry.expires_at > now);
        }
    }
}

impl PriceCache for InMemoryPriceCache {
    fn get(&self, coin_id: &str) -> Option<CoinQuote> {
        let entries = self.read();
        let entry = entries.get(coin_id)?;
        if entry.expires_at > Instant::now() {
            debug!("Price cache hit for {}", coin_id);
            Some(entry.quote.clone())
        } else {
            None
        }
    }

    fn set(&self, coin_id: &str, quote: CoinQuote, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            quote,
            expires_at: Instant::now() + ttl,
        };
        let mut entries = self.write();
        Self::sweep_if_large(&mut entries);
        entries.insert(coin_id.to_string(), entry);
    }

    fn invalidate(&self, coin_id: &str) {
        self.write().remove(coin_id);
    }
}

/// Cache that never stores anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPriceCache;

impl PriceCache for NoopPriceCache {
    fn get(&self, _coin_id: &str) -> Option<CoinQuote> {
        None
    }

    fn set(&self, _coin_id: &str, _quote: CoinQuote, _ttl: Duration) {}

    fn invalidate(&self, _coin_id: &str) {}
}
