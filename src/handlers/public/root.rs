use axum::response::Json;
use serde_json::{json, Value};

/// GET / - Service description
pub async fn get() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Kindergarten RBAC",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Page-level and button-level permission resolution",
            "endpoints": {
                "health": "/health (public)",
                "pageActions": "GET /api/permissions/page-actions?pageId=&pagePath= (protected)",
                "batchCheck": "POST /api/permissions/batch-check (protected)",
                "userPermissions": "GET /api/permissions/user-permissions (protected)",
                "dynamicRoutes": "GET /api/permissions/dynamic-routes (protected)",
                "check": "POST /api/permissions/check (protected)",
                "routes": "GET /api/permissions/routes (protected)",
                "cacheStats": "GET /api/permissions/cache/stats (admin)",
                "cacheRefresh": "POST /api/permissions/cache/refresh (admin)",
            }
        }
    }))
}
