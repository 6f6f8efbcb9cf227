use axum::extract::{rejection::JsonRejection, Extension, Json, State};
use serde_json::{json, Value};

use super::timestamp_ms;
use crate::error::ApiError;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::services::resolver::BatchCheck;
use crate::state::AppState;

/// POST /api/permissions/batch-check - Check many codes or paths at once
///
/// Body: `{"permissions": ["ACTIVITY_EDIT", "/centers/activity/list"]}`
pub async fn post(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<BatchCheck> {
    let user = require_user(user)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let keys = permission_keys(&body)?;

    let check = state.resolver.batch_check(&user, &keys).await?;

    let meta = json!({
        "userId": user.id,
        "userRole": user.role,
        "isAdmin": check.is_admin,
        "responseTime": check.elapsed.as_millis() as u64,
        "timestamp": timestamp_ms(),
    });

    Ok(ApiResponse::success(check).with_meta(meta))
}

fn permission_keys(body: &Value) -> Result<Vec<String>, ApiError> {
    let items = body
        .get("permissions")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::bad_request("permissions must be an array of strings"))?;

    if items.is_empty() {
        return Err(ApiError::bad_request("permissions must not be empty"));
    }

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ApiError::bad_request("permissions must be an array of strings"))
        })
        .collect()
}
