use axum::extract::{Extension, State};
use serde_json::{json, Value};

use super::listing_meta;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::services::routes::build_route_tree;
use crate::state::AppState;

/// GET /api/permissions/dynamic-routes - The user's permissions and menu tree
pub async fn get(State(state): State<AppState>, user: Option<Extension<AuthUser>>) -> ApiResult<Value> {
    let user = require_user(user)?;
    let resolved = state.resolver.user_permissions(&user).await?;
    let routes = build_route_tree(&resolved.value);
    let meta = listing_meta(&state, &user, &resolved);

    let data = json!({
        "permissions": resolved.value,
        "routes": routes,
    });

    Ok(ApiResponse::success(data).with_meta(meta))
}
