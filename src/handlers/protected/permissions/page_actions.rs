use axum::extract::{rejection::QueryRejection, Extension, Query, State};
use serde::Deserialize;
use serde_json::json;

use super::timestamp_ms;
use crate::database::models::PageFilter;
use crate::error::ApiError;
use crate::middleware::{require_user, ApiResponse, ApiResult, AuthUser};
use crate::services::resolver::PageActions;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageActionsQuery {
    pub page_id: Option<i64>,
    pub page_path: Option<String>,
}

/// GET /api/permissions/page-actions - Button permissions on a page
///
/// `pageId` matches buttons whose parent is the page, `pagePath` matches
/// buttons whose path contains it. Neither means every button the user holds.
pub async fn get(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    query: Result<Query<PageActionsQuery>, QueryRejection>,
) -> ApiResult<PageActions> {
    let user = require_user(user)?;
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let filter = PageFilter::new(query.page_id, query.page_path);
    let resolved = state.resolver.page_actions(&user, &filter).await?;

    let meta = json!({
        "userId": user.id,
        "userRole": user.role,
        "pageId": filter.page_id,
        "pagePath": filter.page_path,
        "fromCache": resolved.from_cache,
        "responseTime": resolved.elapsed.as_millis() as u64,
        "level": "button",
        "timestamp": timestamp_ms(),
    });

    Ok(ApiResponse::success(resolved.value).with_meta(meta))
}
