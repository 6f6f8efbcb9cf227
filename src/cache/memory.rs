use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::{CacheError, RouteCache, RouteSnapshot};

/// Process-local route cache. Readers clone the inner `Arc` and release
/// the lock immediately; published snapshots are never mutated.
#[derive(Debug)]
pub struct MemoryRouteCache {
    current: RwLock<Option<Arc<RouteSnapshot>>>,
    stale_after: Duration,
}

impl MemoryRouteCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            stale_after,
        }
    }
}

impl RouteCache for MemoryRouteCache {
    fn is_healthy(&self) -> bool {
        match self.snapshot() {
            Ok(snapshot) => snapshot.age() <= self.stale_after,
            Err(_) => false,
        }
    }

    fn snapshot(&self) -> Result<Arc<RouteSnapshot>, CacheError> {
        let guard = self.current.read().map_err(|_| CacheError::Poisoned)?;
        guard.as_ref().cloned().ok_or(CacheError::NotLoaded)
    }

    fn replace(&self, snapshot: RouteSnapshot) {
        match self.current.write() {
            Ok(mut guard) => *guard = Some(Arc::new(snapshot)),
            Err(poisoned) => {
                tracing::warn!("Route cache lock was poisoned; replacing snapshot anyway");
                let mut guard = poisoned.into_inner();
                *guard = Some(Arc::new(snapshot));
                self.current.clear_poison();
            }
        }
    }

    fn invalidate(&self) {
        match self.current.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => {
                *poisoned.into_inner() = None;
                self.current.clear_poison();
            }
        }
    }
}
