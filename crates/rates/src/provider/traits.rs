//! Price provider trait definition.

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Strategy the resolver applies when a provider's direct pair attempt
/// fails with `PairUnsupported`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairFallback {
    /// Triangulate both tickers through the pivot ticker on the same
    /// provider and divide the two legs.
    Pivot,
    /// Fetch the reversed pair and invert the result. Used by providers
    /// that expose a rates-by-base-currency endpoint and have no pivot
    /// concept of their own.
    Inverse,
}

/// Trait for a single price source.
///
/// Implement this to add a new venue or aggregator. An implementation
/// exposes exactly one capability (the price of 1 unit of `base` in units
/// of `quote`) over its own wire format, and classifies every failure
/// into the two-kind error taxonomy so cooldown handling stays correct.
///
/// Implementations must return only positive, finite prices; anything else
/// is an upstream failure, never a quote.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Unique identifier, used for logging, cooldown tracking and quote
    /// attribution.
    fn id(&self) -> &'static str;

    /// Fallback strategy after a failed direct attempt. Most venues quote
    /// enough pairs against the pivot for triangulation to be the default.
    fn pair_fallback(&self) -> PairFallback {
        PairFallback::Pivot
    }

    /// Price of 1 unit of `base` expressed in units of `quote`.
    ///
    /// Tickers arrive normalized (lowercase, alias-resolved); adapters
    /// upcase or join them however their wire format requires.
    async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError>;
}
