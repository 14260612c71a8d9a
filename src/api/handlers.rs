//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::api::middleware::RateLimitGuard;
use crate::cache::{CacheStore, SharedCache};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, GetResponse, HealthResponse, InvalidateRequest,
    InvalidateResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::ratelimit::{LimiterClass, RateLimiters};

/// Application state shared across all handlers.
///
/// Holds one cache and one limiter set, constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache<Value>,
    pub limiters: RateLimiters,
}

impl AppState {
    pub fn new(cache: CacheStore<Value>, limiters: RateLimiters) -> Self {
        Self {
            cache: SharedCache::new(cache),
            limiters,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut cache = CacheStore::new(config.default_ttl());
        if let Some(max_entries) = config.max_entries {
            cache = cache.with_capacity(max_entries);
        }
        Self::new(cache, RateLimiters::new(config.rate_limits))
    }

    /// Middleware state enforcing `class` limits.
    ///
    /// Retry hints are computed on the limiters' own clock.
    pub fn rate_limit_guard(&self, class: LimiterClass) -> RateLimitGuard {
        RateLimitGuard::new(
            class,
            self.limiters.get(class).clone(),
            self.limiters.clock().clone(),
        )
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl();
    state.cache.set(req.key.clone(), req.value, ttl).await;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key).await {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(ApiError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key).await;
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for POST /admin/invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate_by_prefix(&req.prefix).await;
    info!(prefix = %req.prefix, removed, "cache invalidated by prefix");

    Json(InvalidateResponse {
        prefix: req.prefix,
        removed,
    })
}

/// Handler for POST /admin/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.clear().await;
    info!(removed, "cache cleared");

    Json(ClearResponse { removed })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    let rate_limits = state.limiters.tracked_clients().await;

    Json(StatsResponse::new(stats, rate_limits))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
