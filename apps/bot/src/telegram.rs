//! Telegram Bot API types and outbound delivery.
//!
//! Inbound updates arrive through the webhook as JSON; only the fields the
//! bot actually reads are modeled. Outbound delivery is best-effort: the
//! Bot API applies its own flood control, and a dropped reply is cheaper
//! than a retry storm against a rate-limited token.

use std::time::Duration;

use anyhow::anyhow;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const API_URL: &str = "https://api.telegram.org";

/// Outbound request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Incoming webhook payload.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    /// Absent for update kinds the bot does not handle (edits, joins, ...).
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Response envelope from the Bot API.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Outbound Telegram Bot API client.
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(bot_token: &str) -> Self {
        Self::with_api_url(API_URL, bot_token)
    }

    /// Point the client at a different API host. Used by tests.
    pub fn with_api_url(api_url: &str, bot_token: &str) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: format!("{}/bot{}", api_url, bot_token),
        }
    }

    /// Send a Markdown-formatted message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let api: ApiResponse = response.json().await?;
        if !api.ok {
            return Err(anyhow!(
                "sendMessage failed (HTTP {}): {}",
                status,
                api.description.unwrap_or_else(|| "no description".to_string())
            ));
        }
        Ok(())
    }
}
