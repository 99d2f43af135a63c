use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "mockMode": state.config.use_mock,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
