//! Binance spot market price provider.
//!
//! Fetches the last traded price for a symbol from the public
//! `/api/v3/ticker/price` endpoint. No authentication is required.
//! Binance operates interchangeable API mirrors; each request walks the
//! host list in order and the first usable answer wins.
//!
//! API documentation: https://binance-docs.github.io/apidocs/spot/en/

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::provider::{PriceProvider, USER_AGENT};

const PROVIDER_ID: &str = "BINANCE";

/// Interchangeable API mirrors, tried in order.
const HOSTS: &[&str] = &[
    "https://api.binance.com",
    "https://api1.binance.com",
    "https://api2.binance.com",
];

/// Binance error code for an unknown trading symbol.
const CODE_INVALID_SYMBOL: i64 = -1121;

/// Default HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Response from /api/v3/ticker/price
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    /// Last traded price, as a decimal string
    price: String,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
}

/// Binance spot market price provider.
pub struct BinanceProvider {
    client: Client,
}

impl BinanceProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// One attempt against a single mirror host.
    async fn spot_from_host(
        &self,
        host: &str,
        symbol: &str,
    ) -> Result<f64, ProviderError> {
        let url = format!("{}/api/v3/ticker/price?symbol={}", host, symbol);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &body));
        }

        let ticker: TickerPriceResponse = response.json().await?;
        parse_price(&ticker.price)
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceProvider for BinanceProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn spot(&self, base: &str, quote: &str) -> Result<f64, ProviderError> {
        // Binance symbols are the bare uppercase concatenation, e.g. BTCUSDT.
        let symbol = format!("{}{}", base.to_uppercase(), quote.to_uppercase());

        let mut last_err = ProviderError::upstream("no Binance host reachable");
        for host in HOSTS {
            match self.spot_from_host(host, &symbol).await {
                Ok(price) => return Ok(price),
                // An invalid-symbol answer is a completed exchange, not a
                // host failure; the mirrors all share the same listings.
                Err(ProviderError::PairUnsupported) => {
                    return Err(ProviderError::PairUnsupported)
                }
                Err(err) => {
                    debug!("binance host {} failed: {}", host, err);
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

/// Map a non-2xx response to the error taxonomy.
fn classify_error(status: StatusCode, body: &str) -> ProviderError {
    if let Ok(err) = serde_json::from_str::<ErrorResponse>(body) {
        if err.code == Some(CODE_INVALID_SYMBOL) {
            return ProviderError::PairUnsupported;
        }
        if let Some(msg) = err.msg {
            return ProviderError::upstream(format!("HTTP {}: {}", status, msg));
        }
    }
    ProviderError::upstream(format!("HTTP {}", status))
}

/// Parse and validate a decimal-string price.
fn parse_price(raw: &str) -> Result<f64, ProviderError> {
    let price: f64 = raw
        .parse()
        .map_err(|_| ProviderError::upstream(format!("unparsable price {:?}", raw)))?;
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ProviderError::upstream(format!("invalid price {}", price)))
    }
}
