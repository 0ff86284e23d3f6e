//! Short-TTL memoization of resolved pair rates.
//!
//! The cache exists to absorb bursts of identical conversion requests, not
//! to be a price store: entries live for seconds, expiry is checked lazily
//! on read, and nothing is ever evicted explicitly. The map is in-memory
//! and resets on application restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::warn;

use crate::models::PriceQuote;

/// Default entry lifetime.
const DEFAULT_TTL: Duration = Duration::from_secs(30);

struct Entry {
    quote: PriceQuote,
    created_at: Instant,
}

/// Thread-safe rate cache keyed by order-sensitive pair key.
pub struct RateCache {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

impl RateCache {
    /// Create a cache with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create a cache with a custom TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Lock the entry map, recovering from poison if necessary.
    ///
    /// Worst case after recovery is a stale or missing cache entry, which
    /// the resolver already tolerates.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("rate cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Fetch a live entry for the pair key.
    ///
    /// Entries at or past the TTL are treated as absent. They are left in
    /// place; the next successful resolution overwrites them.
    pub fn get(&self, key: &str) -> Option<PriceQuote> {
        let entries = self.lock_entries();
        entries.get(key).and_then(|entry| {
            if entry.created_at.elapsed() < self.ttl {
                Some(entry.quote.clone())
            } else {
                None
            }
        })
    }

    /// Store a quote for the pair key, overwriting unconditionally.
    pub fn put(&self, key: String, quote: PriceQuote) {
        let mut entries = self.lock_entries();
        entries.insert(
            key,
            Entry {
                quote,
                created_at: Instant::now(),
            },
        );
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new()
    }
}
