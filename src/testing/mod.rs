//! In-memory doubles for the permission store and route cache, shared by
//! the unit tests.

pub mod fixtures;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheError, MemoryRouteCache, RouteCache, RouteSnapshot};
use crate::database::models::{GrantedKey, PageFilter, Permission, UserGrant};
use crate::database::{CheckTarget, PermissionStore, StoreError};
use fixtures::Role;

/// Permission store over plain vectors with the same join semantics as
/// the SQL store. Counts every call so tests can assert "no database".
pub struct MemoryStore {
    permissions: Vec<Permission>,
    roles: Vec<(Role, Vec<i64>)>,
    user_roles: Vec<(i64, i64)>,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryStore {
    pub fn new(permissions: Vec<Permission>, roles: Vec<(Role, Vec<i64>)>, user_roles: Vec<(i64, i64)>) -> Self {
        Self {
            permissions,
            roles,
            user_roles,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn seeded() -> Self {
        Self::new(fixtures::permissions(), fixtures::roles(), fixtures::user_roles())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Query("connection refused".to_string()));
        }
        Ok(())
    }

    fn active_roles_of(&self, user_id: i64) -> Vec<&(Role, Vec<i64>)> {
        let role_ids: HashSet<i64> = self
            .user_roles
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, r)| *r)
            .collect();
        self.roles
            .iter()
            .filter(|(role, _)| role_ids.contains(&role.id) && role.status == 1)
            .collect()
    }

    fn reachable(&self, user_id: i64) -> HashSet<i64> {
        self.active_roles_of(user_id)
            .into_iter()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }

    fn sorted(mut rows: Vec<Permission>) -> Vec<Permission> {
        rows.sort_by_key(|p| (p.sort, p.id));
        rows
    }

    fn active(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter().filter(|p| p.is_active())
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn page_buttons(&self, filter: &PageFilter) -> Result<Vec<Permission>, StoreError> {
        self.enter()?;
        Ok(Self::sorted(
            self.active()
                .filter(|p| p.is_button() && filter.matches(p))
                .cloned()
                .collect(),
        ))
    }

    async fn page_buttons_for_user(
        &self,
        user_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Permission>, StoreError> {
        self.enter()?;
        let reachable = self.reachable(user_id);
        Ok(Self::sorted(
            self.active()
                .filter(|p| reachable.contains(&p.id) && p.is_button() && filter.matches(p))
                .cloned()
                .collect(),
        ))
    }

    async fn granted_keys(&self, user_id: i64, keys: &[String]) -> Result<Vec<GrantedKey>, StoreError> {
        self.enter()?;
        let reachable = self.reachable(user_id);
        let wanted = |v: &Option<String>| v.as_ref().map(|v| keys.contains(v)).unwrap_or(false);
        Ok(self
            .active()
            .filter(|p| reachable.contains(&p.id) && (wanted(&p.code) || wanted(&p.path)))
            .map(|p| GrantedKey {
                code: p.code.clone(),
                path: p.path.clone(),
            })
            .collect())
    }

    async fn has_permission(&self, user_id: i64, target: &CheckTarget) -> Result<bool, StoreError> {
        self.enter()?;
        let reachable = self.reachable(user_id);
        Ok(self.active().any(|p| reachable.contains(&p.id) && target.matches(p)))
    }

    async fn active_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        self.enter()?;
        Ok(Self::sorted(self.active().cloned().collect()))
    }

    async fn permissions_for_user(&self, user_id: i64) -> Result<Vec<Permission>, StoreError> {
        self.enter()?;
        let reachable = self.reachable(user_id);
        Ok(Self::sorted(
            self.active().filter(|p| reachable.contains(&p.id)).cloned().collect(),
        ))
    }

    async fn all_permissions(&self) -> Result<Vec<Permission>, StoreError> {
        self.enter()?;
        Ok(Self::sorted(self.permissions.clone()))
    }

    async fn user_grants(&self) -> Result<Vec<UserGrant>, StoreError> {
        self.enter()?;
        let users: HashSet<i64> = self.user_roles.iter().map(|(u, _)| *u).collect();
        Ok(users
            .into_iter()
            .flat_map(|user_id| {
                self.reachable(user_id)
                    .into_iter()
                    .map(move |permission_id| UserGrant { user_id, permission_id })
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter()
    }
}

/// Route cache wrapper that counts reads and can be told to fail them
/// while still reporting healthy.
pub struct TrackingCache {
    inner: MemoryRouteCache,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
}

impl TrackingCache {
    pub fn empty() -> Self {
        Self {
            inner: MemoryRouteCache::new(Duration::from_secs(300)),
            reads: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// A healthy cache holding the store's current contents
    pub async fn warmed_from(store: &MemoryStore) -> Self {
        let cache = Self::empty();
        let routes = store.all_permissions().await.unwrap_or_default();
        let grants = store.user_grants().await.unwrap_or_default();
        cache.inner.replace(RouteSnapshot::build(routes, grants));
        cache
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl RouteCache for TrackingCache {
    fn is_healthy(&self) -> bool {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.fail_reads.load(Ordering::SeqCst) || self.inner.is_healthy()
    }

    fn snapshot(&self) -> Result<Arc<RouteSnapshot>, CacheError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CacheError::Poisoned);
        }
        self.inner.snapshot()
    }

    fn replace(&self, snapshot: RouteSnapshot) {
        self.inner.replace(snapshot);
    }

    fn invalidate(&self) {
        self.inner.invalidate();
    }
}
