//! Liveness with a database round-trip.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let pool = state.db.ping().await?;
    Ok(Json(json!({
        "status": "ok",
        "pool": { "size": pool.size, "idle": pool.idle },
    })))
}
