pub mod batch_check;
pub mod cache;
pub mod check;
pub mod dynamic_routes;
pub mod page_actions;
pub mod routes;
pub mod user_permissions;

use chrono::Utc;
use serde_json::{json, Value};

use crate::middleware::AuthUser;
use crate::services::resolver::Resolved;
use crate::state::AppState;

pub use batch_check::post as batch_check_post;
pub use cache::refresh as cache_refresh_post;
pub use cache::stats as cache_stats_get;
pub use check::post as check_post;
pub use dynamic_routes::get as dynamic_routes_get;
pub use page_actions::get as page_actions_get;
pub use routes::get as routes_get;
pub use user_permissions::get as user_permissions_get;

/// Milliseconds since the epoch, as reported in `meta.timestamp`
pub(crate) fn timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// `meta` shared by the per-user listing endpoints: who asked, where the
/// answer came from, and the resolver counters at the time.
pub(crate) fn listing_meta<T>(state: &AppState, user: &AuthUser, resolved: &Resolved<T>) -> Value {
    let stats = state.resolver.stats().report();
    json!({
        "userId": user.id,
        "userRole": user.role,
        "isAdmin": state.resolver.is_super_admin(user),
        "fromCache": resolved.from_cache,
        "responseTime": resolved.elapsed.as_millis() as u64,
        "cacheHitRate": stats.hit_rate,
        "cacheStats": {
            "totalRequests": stats.total_requests,
            "cacheHits": stats.cache_hits,
            "cacheMisses": stats.cache_misses,
        },
        "timestamp": timestamp_ms(),
    })
}
