//! In-memory route cache consulted by the permission resolver.
//!
//! The cache holds an immutable [`RouteSnapshot`] of every permission row
//! plus the permission ids each user reaches through active roles. A
//! snapshot is published whole by [`warmer`] and read without copying; the
//! resolver only reads it and falls back to the store whenever
//! [`RouteCache::is_healthy`] is false or a read fails.

pub mod memory;
pub mod warmer;

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::database::models::{Permission, UserGrant};

pub use memory::MemoryRouteCache;

/// A cached permission row. Same shape as the table projection.
pub type CachedRoute = Permission;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("route cache has not been loaded")]
    NotLoaded,

    #[error("route cache lock poisoned")]
    Poisoned,
}

#[derive(Debug)]
pub struct RouteSnapshot {
    routes: Arc<[CachedRoute]>,
    grants: HashMap<i64, HashSet<i64>>,
    loaded_at: Instant,
}

impl RouteSnapshot {
    pub fn build(routes: Vec<CachedRoute>, grants: Vec<UserGrant>) -> Self {
        let mut by_user: HashMap<i64, HashSet<i64>> = HashMap::new();
        for grant in grants {
            by_user.entry(grant.user_id).or_default().insert(grant.permission_id);
        }

        Self {
            routes: routes.into(),
            grants: by_user,
            loaded_at: Instant::now(),
        }
    }

    /// Backdate the snapshot, used to exercise staleness.
    pub fn loaded_ago(mut self, age: Duration) -> Self {
        if let Some(at) = Instant::now().checked_sub(age) {
            self.loaded_at = at;
        }
        self
    }

    pub fn routes(&self) -> &Arc<[CachedRoute]> {
        &self.routes
    }

    /// Whether the user reaches the permission through an active role
    pub fn is_granted(&self, user_id: i64, permission_id: i64) -> bool {
        self.grants
            .get(&user_id)
            .map(|ids| ids.contains(&permission_id))
            .unwrap_or(false)
    }

    pub fn age(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn user_count(&self) -> usize {
        self.grants.len()
    }
}

/// Point-in-time description of the cache for stats and health output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub healthy: bool,
    pub loaded: bool,
    pub age_secs: Option<u64>,
    pub route_count: usize,
    pub user_count: usize,
}

/// Route cache contract. The resolver only calls the read side
/// (`is_healthy`, `snapshot`, `cached_routes`); `replace` and `invalidate`
/// belong to the warmer and the admin refresh endpoint.
pub trait RouteCache: Send + Sync {
    /// True while a snapshot is loaded and not stale.
    fn is_healthy(&self) -> bool;

    fn snapshot(&self) -> Result<Arc<RouteSnapshot>, CacheError>;

    fn cached_routes(&self) -> Result<Arc<[CachedRoute]>, CacheError> {
        Ok(self.snapshot()?.routes().clone())
    }

    fn replace(&self, snapshot: RouteSnapshot);

    fn invalidate(&self);

    fn status(&self) -> CacheStatus {
        match self.snapshot() {
            Ok(snapshot) => CacheStatus {
                healthy: self.is_healthy(),
                loaded: true,
                age_secs: Some(snapshot.age().as_secs()),
                route_count: snapshot.route_count(),
                user_count: snapshot.user_count(),
            },
            Err(_) => CacheStatus {
                healthy: false,
                loaded: false,
                age_secs: None,
                route_count: 0,
                user_count: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_groups_grants_by_user() {
        let snapshot = RouteSnapshot::build(
            Vec::new(),
            vec![
                UserGrant { user_id: 1, permission_id: 10 },
                UserGrant { user_id: 1, permission_id: 11 },
                UserGrant { user_id: 2, permission_id: 10 },
            ],
        );
        assert!(snapshot.is_granted(1, 11));
        assert!(snapshot.is_granted(2, 10));
        assert!(!snapshot.is_granted(2, 11));
        assert!(!snapshot.is_granted(3, 10));
        assert_eq!(snapshot.user_count(), 2);
    }
}
