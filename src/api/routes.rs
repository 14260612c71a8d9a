//! API Routes
//!
//! Configures the Axum router with all endpoints and their rate limit classes.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, invalidate_handler, set_handler,
    stats_handler, AppState,
};
use super::middleware::enforce_rate_limit;
use crate::ratelimit::LimiterClass;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check, not rate limited
/// - `GET /stats` - Cache and limiter statistics (general)
/// - `PUT /cache` - Store a value (general)
/// - `GET /cache/:key` - Retrieve a value (general)
/// - `DELETE /cache/:key` - Delete a value (general)
/// - `POST /admin/invalidate` - Drop every key with a prefix (sensitive)
/// - `POST /admin/clear` - Drop everything (sensitive)
///
/// The `auth` class guards no built-in route. It is reserved for credential
/// endpoints mounted next to this router through
/// [`AppState::rate_limit_guard`].
///
/// # Middleware
/// - Rate limiting per route class
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_routes = Router::new()
        .route("/stats", get(stats_handler))
        .route("/cache", put(set_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit_guard(LimiterClass::General),
            enforce_rate_limit,
        ));

    let admin_routes = Router::new()
        .route("/admin/invalidate", post(invalidate_handler))
        .route("/admin/clear", post(clear_handler))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit_guard(LimiterClass::Sensitive),
            enforce_rate_limit,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(cache_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
