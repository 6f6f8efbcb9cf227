use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cache::warmer;
use crate::error::ApiError;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub invalidate: bool,
}

fn require_admin(state: &AppState, user: &AuthUser) -> Result<(), ApiError> {
    if state.resolver.is_super_admin(user) {
        Ok(())
    } else {
        tracing::warn!("User {} ({}) denied access to cache administration", user.id, user.role);
        Err(ApiError::forbidden("Administrator role required"))
    }
}

/// GET /api/permissions/cache/stats - Resolution counters and snapshot status (admin)
pub async fn stats(State(state): State<AppState>, user: Option<Extension<AuthUser>>) -> ApiResult<Value> {
    let user = require_user(user)?;
    require_admin(&state, &user)?;

    Ok(ApiResponse::success(json!({
        "resolver": state.resolver.stats().report(),
        "cacheEnabled": state.cache_enabled,
        "cache": state.resolver.cache().status(),
    })))
}

/// POST /api/permissions/cache/refresh - Reload the snapshot, or drop it (admin)
///
/// An empty body reloads. `{"invalidate": true}` drops the snapshot so
/// every read goes to the store until the next refresh. Reloading is
/// refused while the cache is disabled.
pub async fn refresh(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let user = require_user(user)?;
    require_admin(&state, &user)?;

    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => RefreshRequest::default(),
        Err(e) => return Err(ApiError::bad_request(e.body_text())),
    };

    let cache = state.resolver.cache();
    if !request.invalidate && !state.cache_enabled {
        return Err(ApiError::bad_request("Route cache is disabled"));
    }

    if request.invalidate {
        cache.invalidate();
        tracing::info!("Route cache invalidated by user {}", user.id);
    } else {
        let count = warmer::refresh(state.resolver.store().as_ref(), cache.as_ref()).await?;
        tracing::info!("Route cache reloaded by user {} ({} routes)", user.id, count);
    }

    Ok(ApiResponse::success(json!({
        "invalidated": request.invalidate,
        "cache": cache.status(),
    })))
}
