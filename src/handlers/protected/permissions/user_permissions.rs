use axum::extract::{Extension, State};
use serde_json::{json, Value};

use super::listing_meta;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/permissions/user-permissions - Codes of every permission the user holds
///
/// `data` is the code array itself.
pub async fn get(State(state): State<AppState>, user: Option<Extension<AuthUser>>) -> ApiResult<Value> {
    let user = require_user(user)?;
    let resolved = state.resolver.permission_codes(&user).await?;
    let meta = listing_meta(&state, &user, &resolved);

    Ok(ApiResponse::success(json!(resolved.value)).with_meta(meta))
}
