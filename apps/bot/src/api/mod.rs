mod health;
mod webhook;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook/telegram", post(webhook::telegram_webhook))
        .route("/api/health", get(health::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
