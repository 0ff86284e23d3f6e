use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
pub async fn get_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
