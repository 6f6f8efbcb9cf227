use axum::extract::{Extension, State};
use serde_json::json;

use super::timestamp_ms;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::services::routes::RouteEntry;
use crate::state::AppState;

/// GET /api/permissions/routes - Front-end route table for every active menu and button
pub async fn get(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
) -> ApiResult<Vec<RouteEntry>> {
    require_user(user)?;
    let resolved = state.resolver.all_routes().await?;

    let cache_status = if state.resolver.cache().is_healthy() {
        "healthy"
    } else {
        "unhealthy"
    };
    let meta = json!({
        "cacheStatus": cache_status,
        "routeCount": resolved.value.len(),
        "fromCache": resolved.from_cache,
        "responseTime": resolved.elapsed.as_millis() as u64,
        "timestamp": timestamp_ms(),
    });

    Ok(ApiResponse::success(resolved.value).with_meta(meta))
}
