//! Telegram webhook endpoint.
//!
//! Telegram redelivers any update that does not get a 2xx, so this handler
//! acknowledges every authenticated delivery immediately and does the
//! actual work (rate resolution, outbound reply) in a detached task.
//! Processing failures are logged, never surfaced to Telegram.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{debug, warn};

use crate::handler::respond_to;
use crate::main_lib::AppState;
use crate::telegram::Update;

/// Header Telegram echoes the configured secret token in.
const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(update): Json<Update>,
) -> StatusCode {
    let presented = headers
        .get(SECRET_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if presented != state.webhook_secret {
        warn!("webhook delivery with bad secret token rejected");
        return StatusCode::UNAUTHORIZED;
    }

    let (chat_id, text) = match update.message {
        Some(message) => match message.text {
            Some(text) => (message.chat.id, text),
            None => return StatusCode::OK,
        },
        None => return StatusCode::OK,
    };

    debug!("update {} from chat {}", update.update_id, chat_id);

    tokio::spawn(async move {
        if let Some(reply) = respond_to(&state.resolver, &text).await {
            // Best-effort delivery; Telegram flood control is its problem.
            if let Err(err) = state.telegram.send_message(chat_id, &reply).await {
                warn!("reply to chat {} dropped: {}", chat_id, err);
            }
        }
    });

    StatusCode::OK
}
