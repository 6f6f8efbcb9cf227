//! Resolves what an authenticated user may see and do.
//!
//! Every read goes to the route cache first and falls back to the store
//! when the cache reports unhealthy or the read fails. Both paths apply the
//! same filters and ordering so callers cannot tell them apart except by
//! the `from_cache` flag.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::grouping::{group, GroupedPermissions};
use super::routes::{route_entries, RouteEntry};
use super::stats::ResolverStats;
use crate::auth::AdminPolicy;
use crate::cache::{RouteCache, RouteSnapshot};
use crate::database::models::{PageFilter, Permission};
use crate::database::{CheckTarget, PermissionStore, StoreError};
use crate::middleware::AuthUser;

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Permission list must not be empty")]
    EmptyPermissionList,

    #[error("Either path or permission is required")]
    MissingCheckTarget,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A resolved value plus where it came from and how long it took.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub value: T,
    pub from_cache: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageActions {
    pub permissions: Vec<Permission>,
    pub grouped: GroupedPermissions,
    pub summary: PageActionSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageActionSummary {
    pub total: usize,
    pub actions: usize,
    pub navigation: usize,
    pub operations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchCheck {
    pub results: BTreeMap<String, bool>,
    pub summary: BatchSummary,
    #[serde(skip)]
    pub is_admin: bool,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub granted: usize,
    pub denied: usize,
}

impl BatchSummary {
    fn of(results: &BTreeMap<String, bool>) -> Self {
        let granted = results.values().filter(|v| **v).count();
        Self {
            total: results.len(),
            granted,
            denied: results.len() - granted,
        }
    }
}

pub struct PermissionResolver {
    store: Arc<dyn PermissionStore>,
    cache: Arc<dyn RouteCache>,
    admin: AdminPolicy,
    stats: ResolverStats,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn PermissionStore>, cache: Arc<dyn RouteCache>, admin: AdminPolicy) -> Self {
        Self {
            store,
            cache,
            admin,
            stats: ResolverStats::new(),
        }
    }

    pub fn is_super_admin(&self, user: &AuthUser) -> bool {
        self.admin.is_super_admin(user)
    }

    pub fn cache(&self) -> &Arc<dyn RouteCache> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn PermissionStore> {
        &self.store
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Button permissions the user holds on a page, grouped for rendering.
    pub async fn page_actions(
        &self,
        user: &AuthUser,
        filter: &PageFilter,
    ) -> Result<Resolved<PageActions>, ResolverError> {
        let is_admin = self.is_super_admin(user);

        let resolved = self
            .resolve(
                "page_actions",
                user,
                |snapshot| {
                    visible(snapshot, user.id, is_admin)
                        .filter(|p| p.is_button() && filter.matches(p))
                        .cloned()
                        .collect()
                },
                move || async move {
                    if is_admin {
                        self.store.page_buttons(filter).await
                    } else {
                        self.store.page_buttons_for_user(user.id, filter).await
                    }
                },
            )
            .await?;

        let permissions: Vec<Permission> = resolved.value;
        let grouped = group(&permissions);
        let summary = PageActionSummary {
            total: permissions.len(),
            actions: grouped.actions.len(),
            navigation: grouped.navigation.len(),
            operations: grouped.operations.len(),
        };

        info!(
            "Page actions for user {} (page {:?} / {:?}): {} permissions, fromCache={} in {}ms",
            user.id,
            filter.page_id,
            filter.page_path,
            permissions.len(),
            resolved.from_cache,
            resolved.elapsed.as_millis()
        );

        Ok(Resolved {
            value: PageActions {
                permissions,
                grouped,
                summary,
            },
            from_cache: resolved.from_cache,
            elapsed: resolved.elapsed,
        })
    }

    /// Map each requested code or path to whether the user holds it.
    pub async fn batch_check(&self, user: &AuthUser, keys: &[String]) -> Result<BatchCheck, ResolverError> {
        if keys.is_empty() {
            return Err(ResolverError::EmptyPermissionList);
        }

        let started = Instant::now();
        let is_admin = self.is_super_admin(user);

        let results: BTreeMap<String, bool> = if is_admin {
            keys.iter().map(|k| (k.clone(), true)).collect()
        } else {
            let distinct: Vec<String> = keys
                .iter()
                .cloned()
                .collect::<HashSet<_>>()
                .into_iter()
                .collect();
            let granted: HashSet<String> = self
                .store
                .granted_keys(user.id, &distinct)
                .await?
                .into_iter()
                .flat_map(|k| [k.code, k.path])
                .flatten()
                .collect();
            distinct
                .into_iter()
                .map(|k| {
                    let held = granted.contains(&k);
                    (k, held)
                })
                .collect()
        };

        let summary = BatchSummary::of(&results);
        let elapsed = started.elapsed();
        info!(
            "Batch check for user {}: {}/{} granted (admin={}) in {}ms",
            user.id,
            summary.granted,
            summary.total,
            is_admin,
            elapsed.as_millis()
        );

        Ok(BatchCheck {
            results,
            summary,
            is_admin,
            elapsed,
        })
    }

    /// Distinct non-empty codes of the user's active permissions.
    pub async fn permission_codes(&self, user: &AuthUser) -> Result<Resolved<Vec<String>>, ResolverError> {
        let resolved = self.user_permissions(user).await?;

        let mut seen = HashSet::new();
        let codes = resolved
            .value
            .iter()
            .filter_map(|p| p.code_str())
            .filter(|c| seen.insert(*c))
            .map(str::to_string)
            .collect();

        Ok(Resolved {
            value: codes,
            from_cache: resolved.from_cache,
            elapsed: resolved.elapsed,
        })
    }

    /// Every active permission the user holds, ordered by `(sort, id)`.
    pub async fn user_permissions(&self, user: &AuthUser) -> Result<Resolved<Vec<Permission>>, ResolverError> {
        let is_admin = self.is_super_admin(user);

        self.resolve(
            "user_permissions",
            user,
            |snapshot| visible(snapshot, user.id, is_admin).cloned().collect(),
            move || async move {
                if is_admin {
                    self.store.active_permissions().await
                } else {
                    self.store.permissions_for_user(user.id).await
                }
            },
        )
        .await
    }

    /// Single path/code check. Admins hold everything.
    pub async fn check(&self, user: &AuthUser, target: &CheckTarget) -> Result<bool, ResolverError> {
        if target.is_empty() {
            return Err(ResolverError::MissingCheckTarget);
        }
        if self.is_super_admin(user) {
            return Ok(true);
        }

        let held = self.store.has_permission(user.id, target).await?;
        debug!("Permission check for user {} on {:?}: {}", user.id, target, held);
        Ok(held)
    }

    /// Front-end routes for every active menu and button.
    pub async fn all_routes(&self) -> Result<Resolved<Vec<RouteEntry>>, ResolverError> {
        let started = Instant::now();

        let cached = self.read_cache("all_routes", |snapshot| route_entries(snapshot.routes().iter()));
        let (routes, from_cache) = match cached {
            Some(routes) => (routes, true),
            None => (route_entries(&self.store.active_permissions().await?), false),
        };

        let elapsed = started.elapsed();
        self.stats.record(from_cache, elapsed);
        Ok(Resolved {
            value: routes,
            from_cache,
            elapsed,
        })
    }

    /// Run `read` against a healthy snapshot, or `None` to fall back.
    fn read_cache<T>(&self, label: &str, read: impl FnOnce(&RouteSnapshot) -> T) -> Option<T> {
        if !self.cache.is_healthy() {
            warn!("Route cache unhealthy, falling back to database for {}", label);
            return None;
        }

        match self.cache.snapshot() {
            Ok(snapshot) => Some(read(snapshot.as_ref())),
            Err(e) => {
                warn!("Route cache read failed for {}, falling back to database: {}", label, e);
                None
            }
        }
    }

    async fn resolve<F, Fut>(
        &self,
        label: &str,
        user: &AuthUser,
        read: impl FnOnce(&RouteSnapshot) -> Vec<Permission>,
        query: F,
    ) -> Result<Resolved<Vec<Permission>>, ResolverError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Permission>, StoreError>>,
    {
        let started = Instant::now();

        let (value, from_cache) = match self.read_cache(label, read) {
            Some(value) => (value, true),
            None => (query().await?, false),
        };

        let elapsed = started.elapsed();
        self.stats.record(from_cache, elapsed);
        debug!(
            "Resolved {} for user {} ({}): {} rows, fromCache={}",
            label,
            user.id,
            user.role,
            value.len(),
            from_cache
        );

        Ok(Resolved {
            value,
            from_cache,
            elapsed,
        })
    }
}

/// Active rows the user may see in a snapshot, ordered by `(sort, id)`.
fn visible<'s>(snapshot: &'s RouteSnapshot, user_id: i64, is_admin: bool) -> impl Iterator<Item = &'s Permission> {
    let mut rows: Vec<&Permission> = snapshot
        .routes()
        .iter()
        .filter(|p| p.is_active())
        .filter(|p| is_admin || snapshot.is_granted(user_id, p.id))
        .collect();
    rows.sort_by_key(|p| (p.sort, p.id));
    rows.into_iter()
}
