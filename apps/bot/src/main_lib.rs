//! Application state and bootstrap helpers.

use std::sync::Arc;

use coinvert_rates::RateResolver;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::telegram::TelegramClient;

pub struct AppState {
    /// Multi-provider rate resolver; owns its cache and cooldown state.
    pub resolver: RateResolver,
    /// Outbound Telegram Bot API client.
    pub telegram: TelegramClient,
    /// Secret token expected on every webhook delivery.
    pub webhook_secret: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("COINVERT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    Arc::new(AppState {
        resolver: RateResolver::with_default_providers(config.cryptocompare_api_key.clone()),
        telegram: TelegramClient::new(&config.bot_token),
        webhook_secret: config.webhook_secret.clone(),
    })
}
