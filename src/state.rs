use std::sync::Arc;

use crate::auth::AdminPolicy;
use crate::cache::RouteCache;
use crate::config::SecurityConfig;
use crate::database::PermissionStore;
use crate::services::PermissionResolver;

/// Shared handler state. Cloned per request, so everything sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PermissionResolver>,
    pub security: Arc<SecurityConfig>,
    /// False under `--no-cache`; the snapshot is never loaded.
    pub cache_enabled: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn PermissionStore>, cache: Arc<dyn RouteCache>, security: SecurityConfig) -> Self {
        let admin = AdminPolicy::new(security.super_admin_roles.clone());
        Self {
            resolver: Arc::new(PermissionResolver::new(store, cache, admin)),
            security: Arc::new(security),
            cache_enabled: true,
        }
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}
