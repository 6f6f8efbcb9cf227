use async_trait::async_trait;
use thiserror::Error;

use super::models::{GrantedKey, PageFilter, Permission, UserGrant};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// What a single permission check asks about. Path and code both given
/// means either may match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTarget {
    pub path: Option<String>,
    pub permission: Option<String>,
}

impl CheckTarget {
    pub fn new(path: Option<String>, permission: Option<String>) -> Self {
        Self {
            path: path.filter(|p| !p.is_empty()),
            permission: permission.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.permission.is_none()
    }

    pub fn matches(&self, permission: &Permission) -> bool {
        let by_path = matches!((&self.path, &permission.path), (Some(a), Some(b)) if a == b);
        let by_code = matches!((&self.permission, permission.code_str()), (Some(a), Some(b)) if a == b);
        by_path || by_code
    }
}

/// Read-only view of the `permissions`, `roles`, `role_permissions` and
/// `user_roles` tables. Every "for user" query joins through active roles
/// and active permissions only.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Active button permissions matching the page filter, no role join.
    async fn page_buttons(&self, filter: &PageFilter) -> Result<Vec<Permission>, StoreError>;

    /// Active button permissions on the page reachable through the user's roles.
    async fn page_buttons_for_user(
        &self,
        user_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Permission>, StoreError>;

    /// `code`/`path` of the user's permissions where either equals one of `keys`.
    async fn granted_keys(&self, user_id: i64, keys: &[String]) -> Result<Vec<GrantedKey>, StoreError>;

    /// Whether any permission the user holds matches the target.
    async fn has_permission(&self, user_id: i64, target: &CheckTarget) -> Result<bool, StoreError>;

    /// All active permissions ordered by `(sort, id)`.
    async fn active_permissions(&self) -> Result<Vec<Permission>, StoreError>;

    /// Active permissions reachable through the user's roles, ordered by `(sort, id)`.
    async fn permissions_for_user(&self, user_id: i64) -> Result<Vec<Permission>, StoreError>;

    /// Every permission row, inactive ones included, for cache snapshots.
    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError>;

    /// Every `(user, permission)` pair reachable through an active role.
    async fn user_grants(&self) -> Result<Vec<UserGrant>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
