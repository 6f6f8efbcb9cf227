use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::{RouteCache, RouteSnapshot};
use crate::database::{PermissionStore, StoreError};

/// Load a fresh snapshot from the store and publish it.
/// On error the previous snapshot stays in place.
pub async fn refresh(store: &dyn PermissionStore, cache: &dyn RouteCache) -> Result<usize, StoreError> {
    let started = Instant::now();
    let (routes, grants) = tokio::try_join!(store.all_permissions(), store.user_grants())?;

    let snapshot = RouteSnapshot::build(routes, grants);
    let count = snapshot.route_count();
    let users = snapshot.user_count();
    cache.replace(snapshot);

    info!(
        "Route cache refreshed: {} routes, {} users in {}ms",
        count,
        users,
        started.elapsed().as_millis()
    );
    Ok(count)
}

/// Shortest refresh period; `tokio::time::interval` panics on zero.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Refresh immediately, then on every tick of `every` (at least
/// [`MIN_REFRESH_INTERVAL`]).
pub fn spawn(store: Arc<dyn PermissionStore>, cache: Arc<dyn RouteCache>, every: Duration) -> JoinHandle<()> {
    let every = every.max(MIN_REFRESH_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = refresh(store.as_ref(), cache.as_ref()).await {
                warn!("Route cache refresh failed, keeping previous snapshot: {}", e);
            }
        }
    })
}
