//! Coinbase exchange-rates provider.
//!
//! Coinbase exposes a rates-by-base-currency table: one request for a
//! currency returns every rate quoted against it. A spot lookup therefore
//! fetches the base's table and reads the quote's entry. There is no pivot
//! concept here; when the direct direction is missing the resolver asks
//! for the reversed pair and inverts the answer
//! ([`PairFallback::Inverse`]).
//!
//! API documentation: https://docs.cdp.coinbase.com/coinbase-app/docs/api-exchange-rates

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::provider::{PairFallback, PriceProvider, USER_AGENT};

const BASE_URL: &str = "https://api.coinbase.com";
const PROVIDER_ID: &str = "COINBASE";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Response from /v2/exchange-rates
#[derive(Debug, Deserialize)]
struct ExchangeRatesResponse {
    data: RatesData,
}

#[derive(Debug, Deserialize)]
struct RatesData {
    /// Rates keyed by uppercase quote ticker, values as decimal strings
    rates: HashMap<String, String>,
}

/// Coinbase exchange-rates provider.
pub struct CoinbaseProvider {
    client: Client,
}

impl CoinbaseProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for CoinbaseProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for CoinbaseProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn pair_fallback(&self) -> PairFallback {
        PairFallback::Inverse
    }

    async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError> {
        let url = format!(
            "{}/v2/exchange-rates?currency={}",
            BASE_URL,
            base.to_uppercase()
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_client_error() {
            // 4xx means the base currency itself is unknown.
            return Err(ProviderError::PairUnsupported);
        }
        if !status.is_success() {
            return Err(ProviderError::upstream(format!("HTTP {}", status)));
        }

        let rates: ExchangeRatesResponse = response.json().await?;
        extract_rate(&rates.data.rates, quote)
    }
}

/// Pull a validated rate for `quote` out of a base currency's rate table.
fn extract_rate(rates: &HashMap<String, String>, quote: &str) -> Result<f64, ProviderError> {
    let raw = match rates.get(&quote.to_uppercase()) {
        Some(raw) => raw,
        // The base exists but is not quoted against this ticker.
        None => return Err(ProviderError::PairUnsupported),
    };

    let rate: f64 = raw
        .parse()
        .map_err(|_| ProviderError::upstream(format!("unparsable rate {:?}", raw)))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(ProviderError::upstream(format!("invalid rate {}", rate)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extracts_quoted_rate() {
        let rates = table(&[("USDT", "65000.12"), ("EUR", "60000.50")]);
        assert_eq!(extract_rate(&rates, "usdt").unwrap(), 65000.12);
    }

    #[test]
    fn test_missing_quote_is_pair_unsupported() {
        let rates = table(&[("EUR", "60000.50")]);
        assert!(matches!(
            extract_rate(&rates, "usdt"),
            Err(ProviderError::PairUnsupported)
        ));
    }

    #[test]
    fn test_unparsable_rate_is_upstream() {
        let rates = table(&[("USDT", "sixty-five thousand")]);
        let err = extract_rate(&rates, "usdt").unwrap_err();
        assert!(err.cools_provider());
    }

    #[test]
    fn test_non_positive_rate_is_upstream() {
        let rates = table(&[("USDT", "-3.5")]);
        assert!(extract_rate(&rates, "usdt").is_err());
    }

    #[test]
    fn test_fallback_strategy_is_inverse() {
        let provider = CoinbaseProvider::new();
        assert_eq!(provider.pair_fallback(), PairFallback::Inverse);
    }
}
