use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use pantry::now;
use serde_json::{json, Value};

use crate::state::State as AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health))
        .route("/database", get(database_health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "Healthy", "timestamp": now() }))
}

async fn database_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "status": "Healthy", "timestamp": now() })),
        Err(err) => Json(json!({
            "status": "Unhealthy",
            "error": err.to_string(),
            "timestamp": now(),
        })),
    }
}
