use axum::{
    http::{HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{protected::permissions, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn build_app(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        // Protected
        .merge(permission_routes(state.clone()))
        .fallback(not_found)
        .layer(cors_layer(&config.security.cors_origins));

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn permission_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/permissions/page-actions", get(permissions::page_actions_get))
        .route("/api/permissions/batch-check", post(permissions::batch_check_post))
        .route("/api/permissions/user-permissions", get(permissions::user_permissions_get))
        .route("/api/permissions/dynamic-routes", get(permissions::dynamic_routes_get))
        .route("/api/permissions/check", post(permissions::check_post))
        .route("/api/permissions/routes", get(permissions::routes_get))
        .route("/api/permissions/cache/stats", get(permissions::cache_stats_get))
        .route("/api/permissions/cache/refresh", post(permissions::cache_refresh_post))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

async fn not_found() -> impl IntoResponse {
    ApiError::not_found("Route not found")
}
