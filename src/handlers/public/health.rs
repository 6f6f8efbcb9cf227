use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /health - Store ping plus route cache status
///
/// 503 when the store cannot be reached. An unloaded cache alone does not
/// fail the check, since every read falls back to the store.
pub async fn get(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();
    let cache = state.resolver.cache().status();

    match state.resolver.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "cache": cache,
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            let error = ApiError::service_unavailable("Database unavailable");
            let mut body = error.to_json();
            body["data"] = json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable",
                "cache": cache,
            });
            (error.status_code(), Json(body))
        }
    }
}
