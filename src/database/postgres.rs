use async_trait::async_trait;
use sqlx::PgPool;
use std::time::{Duration, Instant};

use super::models::{GrantedKey, PageFilter, Permission, UserGrant};
use super::store::{CheckTarget, PermissionStore, StoreError};

const PERMISSION_COLUMNS: &str = r#"
    p.id::int8 AS id,
    p.name,
    p.code,
    p.permission,
    p.path,
    p.component,
    p.icon,
    p.type,
    p.parent_id::int8 AS parent_id,
    p.category,
    p.status::int4 AS status,
    p.sort::int4 AS sort
"#;

// Joins from a permission `p` to the users holding it through active roles.
const USER_ROLE_JOINS: &str = r#"
    INNER JOIN role_permissions rp ON p.id = rp.permission_id
    INNER JOIN roles r ON rp.role_id = r.id
    INNER JOIN user_roles ur ON r.id = ur.role_id
"#;

// $1 = page id, $2 = page path
const PAGE_CONDITION: &str = r#"
    (($1::int8 IS NULL AND $2::text IS NULL)
        OR p.parent_id = $1
        OR strpos(p.path, $2) > 0)
"#;

/// PostgreSQL-backed permission store. All user-supplied values are bound.
#[derive(Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
    slow_query_threshold: Duration,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool, slow_query_threshold: Duration) -> Self {
        Self { pool, slow_query_threshold }
    }

    fn observe(&self, label: &str, started: Instant, rows: usize) {
        let elapsed = started.elapsed();
        if elapsed > self.slow_query_threshold {
            tracing::warn!("Slow permission query '{}': {}ms ({} rows)", label, elapsed.as_millis(), rows);
        } else {
            tracing::debug!("Permission query '{}': {}ms ({} rows)", label, elapsed.as_millis(), rows);
        }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn page_buttons(&self, filter: &PageFilter) -> Result<Vec<Permission>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT {PERMISSION_COLUMNS}
             FROM permissions p
             WHERE p.type = 'button' AND p.status = 1 AND {PAGE_CONDITION}
             ORDER BY sort, id"
        );

        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(filter.page_id)
            .bind(filter.page_path.as_deref())
            .fetch_all(&self.pool)
            .await?;

        self.observe("page_buttons", started, rows.len());
        Ok(rows)
    }

    async fn page_buttons_for_user(
        &self,
        user_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Permission>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT DISTINCT {PERMISSION_COLUMNS}
             FROM permissions p
             {USER_ROLE_JOINS}
             WHERE ur.user_id = $3
               AND p.type = 'button'
               AND p.status = 1
               AND r.status = 1
               AND {PAGE_CONDITION}
             ORDER BY sort, id"
        );

        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(filter.page_id)
            .bind(filter.page_path.as_deref())
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        self.observe("page_buttons_for_user", started, rows.len());
        Ok(rows)
    }

    async fn granted_keys(&self, user_id: i64, keys: &[String]) -> Result<Vec<GrantedKey>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT DISTINCT p.code, p.path
             FROM permissions p
             {USER_ROLE_JOINS}
             WHERE ur.user_id = $1
               AND p.status = 1
               AND r.status = 1
               AND (p.code = ANY($2) OR p.path = ANY($2))"
        );

        let rows = sqlx::query_as::<_, GrantedKey>(&sql)
            .bind(user_id)
            .bind(keys)
            .fetch_all(&self.pool)
            .await?;

        self.observe("granted_keys", started, rows.len());
        Ok(rows)
    }

    async fn has_permission(&self, user_id: i64, target: &CheckTarget) -> Result<bool, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT EXISTS (
                SELECT 1
                FROM permissions p
                {USER_ROLE_JOINS}
                WHERE ur.user_id = $1
                  AND p.status = 1
                  AND r.status = 1
                  AND (p.path = $2 OR p.code = $3)
             )"
        );

        let (exists,): (bool,) = sqlx::query_as(&sql)
            .bind(user_id)
            .bind(target.path.as_deref())
            .bind(target.permission.as_deref())
            .fetch_one(&self.pool)
            .await?;

        self.observe("has_permission", started, 1);
        Ok(exists)
    }

    async fn active_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT {PERMISSION_COLUMNS}
             FROM permissions p
             WHERE p.status = 1
             ORDER BY sort, id"
        );

        let rows = sqlx::query_as::<_, Permission>(&sql).fetch_all(&self.pool).await?;

        self.observe("active_permissions", started, rows.len());
        Ok(rows)
    }

    async fn permissions_for_user(&self, user_id: i64) -> Result<Vec<Permission>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT DISTINCT {PERMISSION_COLUMNS}
             FROM permissions p
             {USER_ROLE_JOINS}
             WHERE ur.user_id = $1
               AND p.status = 1
               AND r.status = 1
             ORDER BY sort, id"
        );

        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        self.observe("permissions_for_user", started, rows.len());
        Ok(rows)
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        let started = Instant::now();
        let sql = format!(
            "SELECT {PERMISSION_COLUMNS}
             FROM permissions p
             ORDER BY sort, id"
        );

        let rows = sqlx::query_as::<_, Permission>(&sql).fetch_all(&self.pool).await?;

        self.observe("all_permissions", started, rows.len());
        Ok(rows)
    }

    async fn user_grants(&self) -> Result<Vec<UserGrant>, StoreError> {
        let started = Instant::now();
        let rows = sqlx::query_as::<_, UserGrant>(
            r#"
            SELECT DISTINCT ur.user_id::int8 AS user_id, rp.permission_id::int8 AS permission_id
            FROM user_roles ur
            INNER JOIN roles r ON r.id = ur.role_id AND r.status = 1
            INNER JOIN role_permissions rp ON rp.role_id = r.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.observe("user_grants", started, rows.len());
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
