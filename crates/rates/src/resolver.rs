//! Rate resolution across providers.
//!
//! The resolver orchestrates providers, cooldowns and the cache into a
//! single "get rate" operation:
//! 1. Normalize both tickers (alias table included)
//! 2. Identity pairs resolve to 1 without any provider call
//! 3. Cache lookup on the order-sensitive pair key
//! 4. Providers in fixed priority order, direct attempt then fallback
//!    (pivot triangulation or inverse lookup, per provider)
//! 5. `NoRoute` once everything is exhausted
//!
//! The first provider to produce any valid result wins: direct before
//! fallback, provider order before everything. There is no cross-provider
//! averaging or best-price selection; latency and availability are what
//! this trades for.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::cache::RateCache;
use crate::cooldown::{CooldownTracker, DEFAULT_COOLDOWN};
use crate::errors::ResolveError;
use crate::models::{pair_key, PriceQuote};
use crate::provider::{
    binance::BinanceProvider, coinbase::CoinbaseProvider,
    cryptocompare::CryptoCompareProvider, kucoin::KucoinProvider, PairFallback, PriceProvider,
};
use crate::symbol::normalize_ticker;

/// Source label for identity (base == quote) resolutions.
const IDENTITY_SOURCE: &str = "identity";

/// Tunable knobs for a resolver instance.
///
/// Defaults match production behavior; tests shrink the durations to
/// avoid wall-clock sleeps.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Stable reference ticker used for triangulation.
    pub pivot: String,
    /// Suppression window applied to a provider after an upstream failure.
    pub cooldown: Duration,
    /// Lifetime of cached pair rates.
    pub cache_ttl: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pivot: "usdt".to_string(),
            cooldown: DEFAULT_COOLDOWN,
            cache_ttl: Duration::from_secs(30),
        }
    }
}

/// Multi-provider rate resolver.
///
/// Owns its providers, cooldown state and cache as instance fields, so
/// independent resolvers (one per test, one per process) never share
/// hidden state.
pub struct RateResolver {
    providers: Vec<Arc<dyn PriceProvider>>,
    cooldowns: CooldownTracker,
    cache: RateCache,
    pivot: String,
    cooldown: Duration,
}

impl RateResolver {
    /// Create a resolver over an ordered provider list with defaults.
    ///
    /// The list order IS the priority order; earlier providers win.
    pub fn new(providers: Vec<Arc<dyn PriceProvider>>) -> Self {
        Self::with_config(providers, ResolverConfig::default())
    }

    /// Create a resolver with custom configuration.
    pub fn with_config(providers: Vec<Arc<dyn PriceProvider>>, config: ResolverConfig) -> Self {
        Self {
            providers,
            cooldowns: CooldownTracker::new(),
            cache: RateCache::with_ttl(config.cache_ttl),
            pivot: config.pivot,
            cooldown: config.cooldown,
        }
    }

    /// Create a resolver over the canonical production provider order:
    /// Binance, KuCoin, CryptoCompare, Coinbase.
    pub fn with_default_providers(cryptocompare_api_key: Option<String>) -> Self {
        let providers: Vec<Arc<dyn PriceProvider>> = vec![
            Arc::new(BinanceProvider::new()),
            Arc::new(KucoinProvider::new()),
            Arc::new(CryptoCompareProvider::new(cryptocompare_api_key)),
            Arc::new(CoinbaseProvider::new()),
        ];
        Self::new(providers)
    }

    /// Resolve the price of 1 unit of `base_raw` in units of `quote_raw`.
    pub async fn resolve(
        &self,
        base_raw: &str,
        quote_raw: &str,
    ) -> Result<PriceQuote, ResolveError> {
        let base = normalize_ticker(base_raw);
        let quote = normalize_ticker(quote_raw);
        if base.is_empty() || quote.is_empty() {
            return Err(ResolveError::BadSymbol);
        }

        if base == quote {
            return Ok(PriceQuote::new(1.0, IDENTITY_SOURCE));
        }

        let key = pair_key(&base, &quote);
        if let Some(hit) = self.cache.get(&key) {
            debug!("cache hit for {} via {}", key, hit.source);
            return Ok(hit);
        }

        for provider in &self.providers {
            // Direct market for the pair.
            if let Some(rate) = self.attempt(provider.as_ref(), &base, &quote).await {
                return Ok(self.admit(&key, rate, provider.id()));
            }

            // Provider-specific fallback direction.
            let derived = match provider.pair_fallback() {
                PairFallback::Pivot => self.pivot_rate(provider.as_ref(), &base, &quote).await,
                PairFallback::Inverse => self.inverse_rate(provider.as_ref(), &base, &quote).await,
            };
            if let Some(rate) = derived {
                return Ok(self.admit(&key, rate, provider.id()));
            }
        }

        warn!("no route for {}:{}", base, quote);
        Err(ResolveError::NoRoute)
    }

    /// Cache a resolved rate and wrap it for the caller.
    fn admit(&self, key: &str, rate: f64, source: &'static str) -> PriceQuote {
        info!("resolved {} = {} via {}", key, rate, source);
        let quote = PriceQuote::new(rate, source);
        self.cache.put(key.to_string(), quote.clone());
        quote
    }

    /// One guarded attempt against one provider.
    ///
    /// Consults the cooldown before the call, classifies any failure, and
    /// applies the cooldown for upstream errors. Returns the price only if
    /// it is usable; every failure path degrades to `None` so the caller's
    /// loop simply moves on.
    async fn attempt(&self, provider: &dyn PriceProvider, base: &str, quote: &str) -> Option<f64> {
        if self.cooldowns.is_cooling_down(provider.id()) {
            debug!("provider '{}' cooling down, skipping", provider.id());
            return None;
        }

        match provider.spot(base, quote).await {
            Ok(price) => Some(price),
            Err(err) => {
                if err.cools_provider() {
                    warn!("provider '{}' failed: {}", provider.id(), err);
                    self.cooldowns.cool(provider.id(), self.cooldown);
                } else {
                    debug!("provider '{}' does not list {}:{}", provider.id(), base, quote);
                }
                None
            }
        }
    }

    /// Triangulate base:quote through the pivot ticker on one provider.
    ///
    /// Skipped when either side already is the pivot; the direct attempt
    /// covered that market.
    async fn pivot_rate(
        &self,
        provider: &dyn PriceProvider,
        base: &str,
        quote: &str,
    ) -> Option<f64> {
        if base == self.pivot || quote == self.pivot {
            return None;
        }

        let base_in_pivot = self.attempt(provider, base, &self.pivot).await?;
        let quote_in_pivot = self.attempt(provider, quote, &self.pivot).await?;

        let rate = base_in_pivot / quote_in_pivot;
        if rate.is_finite() && rate > 0.0 {
            debug!(
                "pivot-derived {}:{} = {} / {} on '{}'",
                base,
                quote,
                base_in_pivot,
                quote_in_pivot,
                provider.id()
            );
            Some(rate)
        } else {
            None
        }
    }

    /// Fetch the reversed pair and invert, for providers without a pivot.
    async fn inverse_rate(
        &self,
        provider: &dyn PriceProvider,
        base: &str,
        quote: &str,
    ) -> Option<f64> {
        let reverse = self.attempt(provider, quote, base).await?;

        let rate = 1.0 / reverse;
        if rate.is_finite() && rate > 0.0 {
            debug!(
                "inverse-derived {}:{} = 1 / {} on '{}'",
                base,
                quote,
                reverse,
                provider.id()
            );
            Some(rate)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::errors::ProviderError;

    #[derive(Clone, Copy)]
    enum Scripted {
        Price(f64),
        Unsupported,
        Upstream,
    }

    struct MockProvider {
        id: &'static str,
        fallback: PairFallback,
        responses: HashMap<(String, String), Scripted>,
        call_count: AtomicUsize,
    }

    impl MockProvider {
        fn new(id: &'static str) -> Self {
            Self {
                id,
                fallback: PairFallback::Pivot,
                responses: HashMap::new(),
                call_count: AtomicUsize::new(0),
            }
        }

        fn inverse(mut self) -> Self {
            self.fallback = PairFallback::Inverse;
            self
        }

        fn on(mut self, base: &str, quote: &str, response: Scripted) -> Self {
            self.responses
                .insert((base.to_string(), quote.to_string()), response);
            self
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProvider for MockProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        fn pair_fallback(&self) -> PairFallback {
            self.fallback
        }

        async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);

            match self
                .responses
                .get(&(base.to_string(), quote.to_string()))
                .copied()
                .unwrap_or(Scripted::Unsupported)
            {
                Scripted::Price(price) => Ok(price),
                Scripted::Unsupported => Err(ProviderError::PairUnsupported),
                Scripted::Upstream => Err(ProviderError::upstream("mock failure")),
            }
        }
    }

    /// Config with caching disabled and a short cooldown, so tests control
    /// exactly which calls hit the providers.
    fn uncached_config() -> ResolverConfig {
        ResolverConfig {
            cache_ttl: Duration::ZERO,
            cooldown: Duration::from_millis(50),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_identity_pair_skips_providers() {
        let provider = Arc::new(MockProvider::new("P1"));
        let resolver = RateResolver::new(vec![provider.clone()]);

        let quote = resolver.resolve("BTC", " btc ").await.unwrap();
        assert_eq!(quote.rate, 1.0);
        assert_eq!(quote.source, "identity");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_ticker_fails_before_any_call() {
        let provider = Arc::new(MockProvider::new("P1"));
        let resolver = RateResolver::new(vec![provider.clone()]);

        let err = resolver.resolve("$!?", "usdt").await.unwrap_err();
        assert_eq!(err, ResolveError::BadSymbol);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_first_direct_quote_wins() {
        let p1 = Arc::new(MockProvider::new("P1").on("btc", "usdt", Scripted::Price(65000.1234)));
        let p2 = Arc::new(MockProvider::new("P2").on("btc", "usdt", Scripted::Price(1.0)));
        let resolver = RateResolver::new(vec![p1.clone(), p2.clone()]);

        let quote = resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(quote.rate, 65000.1234);
        assert_eq!(quote.source, "P1");
        assert_eq!(p1.calls(), 1);
        assert_eq!(p2.calls(), 0);
    }

    #[tokio::test]
    async fn test_pivot_triangulation() {
        let p1 = Arc::new(
            MockProvider::new("P1")
                .on("eth", "btc", Scripted::Unsupported)
                .on("eth", "usdt", Scripted::Price(3000.0))
                .on("btc", "usdt", Scripted::Price(60000.0)),
        );
        let resolver = RateResolver::new(vec![p1.clone()]);

        let quote = resolver.resolve("eth", "btc").await.unwrap();
        assert!((quote.rate - 0.05).abs() < 1e-12);
        assert_eq!(p1.calls(), 3);
    }

    #[tokio::test]
    async fn test_pivot_skipped_when_quote_is_pivot() {
        let p1 = Arc::new(MockProvider::new("P1"));
        let p2 = Arc::new(MockProvider::new("P2").on("btc", "usdt", Scripted::Price(65000.0)));
        let resolver = RateResolver::new(vec![p1.clone(), p2.clone()]);

        let quote = resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(quote.source, "P2");
        // Direct attempt only: no pivot legs against a usdt-quoted pair.
        assert_eq!(p1.calls(), 1);
    }

    #[tokio::test]
    async fn test_alias_applied_before_providers() {
        let p1 = Arc::new(MockProvider::new("P1").on("btc", "usdt", Scripted::Price(65000.0)));
        let resolver = RateResolver::new(vec![p1.clone()]);

        let quote = resolver.resolve("XBT", "USDT").await.unwrap();
        assert_eq!(quote.rate, 65000.0);
    }

    #[tokio::test]
    async fn test_upstream_failure_cools_provider() {
        let p1 = Arc::new(MockProvider::new("P1").on("btc", "usdt", Scripted::Upstream));
        let p2 = Arc::new(MockProvider::new("P2").on("btc", "usdt", Scripted::Price(65000.0)));
        let resolver = RateResolver::with_config(vec![p1.clone(), p2.clone()], uncached_config());

        let quote = resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(quote.source, "P2");
        assert_eq!(p1.calls(), 1);

        // Within the window P1 must not be called again.
        let quote = resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(quote.source, "P2");
        assert_eq!(p1.calls(), 1);

        // After the window elapses P1 is eligible again.
        tokio::time::sleep(Duration::from_millis(60)).await;
        resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(p1.calls(), 2);
    }

    #[tokio::test]
    async fn test_pair_unsupported_does_not_cool() {
        let p1 = Arc::new(MockProvider::new("P1"));
        let p2 = Arc::new(MockProvider::new("P2").on("btc", "eur", Scripted::Price(60000.0)));
        let resolver = RateResolver::with_config(vec![p1.clone(), p2.clone()], uncached_config());

        resolver.resolve("btc", "eur").await.unwrap();
        let first_round = p1.calls();

        resolver.resolve("btc", "eur").await.unwrap();
        // P1 keeps being consulted: missing pairs are not a health problem.
        assert_eq!(p1.calls(), first_round * 2);
    }

    #[tokio::test]
    async fn test_cache_hit_suppresses_provider_calls() {
        let p1 = Arc::new(MockProvider::new("P1").on("btc", "usdt", Scripted::Price(65000.0)));
        let resolver = RateResolver::new(vec![p1.clone()]);

        resolver.resolve("btc", "usdt").await.unwrap();
        resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(p1.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_expiry_reissues_calls() {
        let p1 = Arc::new(MockProvider::new("P1").on("btc", "usdt", Scripted::Price(65000.0)));
        let config = ResolverConfig {
            cache_ttl: Duration::from_millis(20),
            ..Default::default()
        };
        let resolver = RateResolver::with_config(vec![p1.clone()], config);

        resolver.resolve("btc", "usdt").await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        resolver.resolve("btc", "usdt").await.unwrap();
        assert_eq!(p1.calls(), 2);
    }

    #[tokio::test]
    async fn test_inverse_fallback() {
        let coinbase_like = Arc::new(
            MockProvider::new("CB")
                .inverse()
                .on("usd", "btc", Scripted::Price(0.00002)),
        );
        let resolver = RateResolver::new(vec![coinbase_like.clone()]);

        let quote = resolver.resolve("btc", "usd").await.unwrap();
        assert!((quote.rate - 50000.0).abs() < 1e-6);
        // Direct miss plus one reversed lookup.
        assert_eq!(coinbase_like.calls(), 2);
    }

    #[tokio::test]
    async fn test_everything_exhausted_is_no_route() {
        let p1 = Arc::new(MockProvider::new("P1"));
        let p2 = Arc::new(MockProvider::new("P2").on("btc", "eur", Scripted::Upstream));
        let resolver = RateResolver::new(vec![p1.clone(), p2.clone()]);

        let err = resolver.resolve("btc", "eur").await.unwrap_err();
        assert_eq!(err, ResolveError::NoRoute);
    }

    #[tokio::test]
    async fn test_failed_result_is_not_cached() {
        let p1 = Arc::new(MockProvider::new("P1"));
        let resolver = RateResolver::new(vec![p1.clone()]);

        assert!(resolver.resolve("btc", "eur").await.is_err());
        let calls_after_first = p1.calls();

        // A second resolution goes back to the provider: negative results
        // never enter the cache.
        assert!(resolver.resolve("btc", "eur").await.is_err());
        assert_eq!(p1.calls(), calls_after_first * 2);
    }
}
