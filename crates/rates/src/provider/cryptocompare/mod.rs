//! CryptoCompare aggregated price provider.
//!
//! Fetches aggregated cross-exchange prices from the `/data/price`
//! endpoint. The happy-path body is a flat object keyed by the requested
//! quote tickers (`{"USDT": 65000.1}`); errors come back as HTTP 200 with
//! a `{"Response": "Error", ...}` body, so classification reads the JSON
//! shape rather than the status line.
//!
//! An API key raises the free-tier rate limits but is optional; without
//! one the authorization header is simply omitted.
//!
//! API documentation: https://min-api.cryptocompare.com/documentation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::errors::ProviderError;
use crate::provider::{PriceProvider, USER_AGENT};

const BASE_URL: &str = "https://min-api.cryptocompare.com";
const PROVIDER_ID: &str = "CRYPTOCOMPARE";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// CryptoCompare aggregated price provider.
pub struct CryptoCompareProvider {
    client: Client,
    api_key: Option<String>,
}

impl CryptoCompareProvider {
    /// Create a provider; `api_key` of `None` keeps requests anonymous.
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, api_key }
    }
}

#[async_trait]
impl PriceProvider for CryptoCompareProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError> {
        let url = format!(
            "{}/data/price?fsym={}&tsyms={}",
            BASE_URL,
            base.to_uppercase(),
            quote.to_uppercase()
        );

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("authorization", format!("Apikey {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::upstream(format!("HTTP {}", status)));
        }

        let body: Value = response.json().await?;
        extract_price(&body, quote)
    }
}

/// Pull a validated price for `quote` out of the response body.
///
/// CryptoCompare reports errors inside a 200 body; a message about a
/// missing market means the pair is not aggregated, anything else is an
/// upstream problem.
fn extract_price(body: &Value, quote: &str) -> Result<f64, ProviderError> {
    if body.get("Response").and_then(Value::as_str) == Some("Error") {
        let message = body
            .get("Message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        if message.contains("market does not exist") {
            return Err(ProviderError::PairUnsupported);
        }
        return Err(ProviderError::upstream(message));
    }

    let price = body
        .get(quote.to_uppercase())
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            ProviderError::upstream(format!("missing {} key in response", quote.to_uppercase()))
        })?;

    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ProviderError::upstream(format!("invalid price {}", price)))
    }
}
