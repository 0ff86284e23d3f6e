//! Core value types for the rates crate.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A resolved exchange rate: the price of 1 unit of the base ticker
/// expressed in units of the quote ticker.
///
/// Always positive and finite; the resolver rejects anything else before a
/// `PriceQuote` is constructed.
#[derive(Clone, Debug, Serialize)]
pub struct PriceQuote {
    /// Units of quote per 1 unit of base.
    pub rate: f64,

    /// Source of the rate: a provider id, or "identity" for base == quote.
    pub source: String,

    /// When the rate was obtained from the source.
    pub fetched_at: DateTime<Utc>,
}

impl PriceQuote {
    /// Create a quote stamped with the current time.
    pub fn new(rate: f64, source: impl Into<String>) -> Self {
        Self {
            rate,
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }
}

/// Deterministic, order-sensitive cache key for a pair.
///
/// base:quote is not assumed equal to quote:base; an inverse rate is only
/// ever derived by explicit inversion.
pub fn pair_key(base: &str, quote: &str) -> String {
    format!("{}:{}", base, quote)
}
