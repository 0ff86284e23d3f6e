//! Environment-driven configuration.

use anyhow::Context;

/// Runtime configuration, read once at startup.
pub struct Config {
    /// Telegram Bot API token.
    pub bot_token: String,
    /// Shared secret Telegram echoes back on every webhook delivery.
    pub webhook_secret: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Optional CryptoCompare API key; absence keeps requests anonymous.
    pub cryptocompare_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .context("TELEGRAM_BOT_TOKEN must be set")?;
        let webhook_secret = std::env::var("WEBHOOK_SECRET_TOKEN")
            .context("WEBHOOK_SECRET_TOKEN must be set")?;
        let listen_addr =
            std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cryptocompare_api_key = std::env::var("CRYPTOCOMPARE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            bot_token,
            webhook_secret,
            listen_addr,
            cryptocompare_api_key,
        })
    }
}
