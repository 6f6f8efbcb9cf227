use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `(user, permission)` pair reachable through an active role
/// (`user_roles -> roles -> role_permissions`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserGrant {
    pub user_id: i64,
    pub permission_id: i64,
}

/// `code` and `path` of a permission the user holds, as returned by batch lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GrantedKey {
    pub code: Option<String>,
    pub path: Option<String>,
}
