use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /api/config
///
/// Returns the running configuration as JSON. Read-only: policies and routes
/// are fixed at startup.
pub async fn get_config(State(state): State<SharedState>) -> Json<Value> {
    Json(serde_json::to_value(&state.config).unwrap_or(json!({"error": "serialization failed"})))
}
