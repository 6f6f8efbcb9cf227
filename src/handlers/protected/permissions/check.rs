use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use serde::{Deserialize, Serialize};

use crate::database::CheckTarget;
use crate::error::ApiError;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    pub path: Option<String>,
    pub permission: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub has_permission: bool,
    pub is_admin: bool,
}

/// POST /api/permissions/check - Does the user hold a path or code
pub async fn post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> ApiResult<CheckResponse> {
    let user = require_user(user)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let target = CheckTarget::new(body.path, body.permission);
    let has_permission = state.resolver.check(&user, &target).await?;

    Ok(ApiResponse::success(CheckResponse {
        has_permission,
        is_admin: state.resolver.is_super_admin(&user),
    }))
}
