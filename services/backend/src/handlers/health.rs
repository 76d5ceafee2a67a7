use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness probe; never touches the store.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn detailed_health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.db.health_check().await {
        None => "disabled",
        Some(true) => "healthy",
        Some(false) => "unhealthy",
    };

    Json(json!({
        "status": if database == "unhealthy" { "degraded" } else { "ok" },
        "components": {
            "database": database,
        }
    }))
}
