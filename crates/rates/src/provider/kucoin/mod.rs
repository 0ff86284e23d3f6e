//! KuCoin spot market price provider.
//!
//! Fetches the best-bid/ask midpoint book data from the public level-1
//! orderbook endpoint and uses its `price` field (last trade). KuCoin
//! wraps every payload in an envelope with a string status code; `200000`
//! means success and anything else carries an error message.
//!
//! API documentation: https://www.kucoin.com/docs/rest/spot-trading/market-data

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::provider::{PriceProvider, USER_AGENT};

const BASE_URL: &str = "https://api.kucoin.com";
const PROVIDER_ID: &str = "KUCOIN";

/// Envelope code KuCoin uses for success.
const CODE_OK: &str = "200000";

/// Envelope code for an unknown trading pair.
const CODE_UNSUPPORTED_PAIR: &str = "400100";

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Envelope for /api/v1/market/orderbook/level1
#[derive(Debug, Deserialize)]
struct Level1Response {
    /// Status code as a string, "200000" on success
    code: String,
    /// Error message on failure
    #[serde(default)]
    msg: Option<String>,
    /// Absent or null for unknown symbols
    #[serde(default)]
    data: Option<Level1Data>,
}

#[derive(Debug, Deserialize)]
struct Level1Data {
    /// Last traded price, as a decimal string
    price: Option<String>,
}

/// KuCoin spot market price provider.
pub struct KucoinProvider {
    client: Client,
}

impl KucoinProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }
}

impl Default for KucoinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for KucoinProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError> {
        // KuCoin symbols are dash-joined uppercase, e.g. BTC-USDT.
        let symbol = format!("{}-{}", base.to_uppercase(), quote.to_uppercase());
        let url = format!(
            "{}/api/v1/market/orderbook/level1?symbol={}",
            BASE_URL, symbol
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::upstream(format!("HTTP {}", status)));
        }

        let envelope: Level1Response = response.json().await?;
        extract_price(envelope)
    }
}

/// Pull a validated price out of the response envelope.
fn extract_price(envelope: Level1Response) -> Result<f64, ProviderError> {
    if envelope.code != CODE_OK {
        if envelope.code == CODE_UNSUPPORTED_PAIR {
            return Err(ProviderError::PairUnsupported);
        }
        let msg = envelope.msg.unwrap_or_else(|| "unknown error".to_string());
        return Err(ProviderError::upstream(format!(
            "code {}: {}",
            envelope.code, msg
        )));
    }

    // A success envelope with null data means the symbol is not traded.
    let raw = match envelope.data.and_then(|d| d.price) {
        Some(raw) => raw,
        None => return Err(ProviderError::PairUnsupported),
    };

    let price: f64 = raw
        .parse()
        .map_err(|_| ProviderError::upstream(format!("unparsable price {:?}", raw)))?;
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ProviderError::upstream(format!("invalid price {}", price)))
    }
}
