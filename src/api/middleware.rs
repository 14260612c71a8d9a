//! Rate Limit Middleware
//!
//! Derives a client key from each request, asks the route class's limiter
//! whether it may proceed, and translates the answer into HTTP: 429 with
//! `Retry-After` when denied, quota headers when allowed.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::clock::Clock;
use crate::error::ApiError;
use crate::ratelimit::{LimiterClass, RateLimitDecision, SharedRateLimiter};

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Middleware state: the limiter of one route class.
#[derive(Debug, Clone)]
pub struct RateLimitGuard {
    class: LimiterClass,
    limiter: SharedRateLimiter,
    clock: Arc<dyn Clock>,
}

impl RateLimitGuard {
    pub fn new(class: LimiterClass, limiter: SharedRateLimiter, clock: Arc<dyn Clock>) -> Self {
        Self {
            class,
            limiter,
            clock,
        }
    }
}

/// Applies the guard's limiter to every request passing through.
pub async fn enforce_rate_limit(
    State(guard): State<RateLimitGuard>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    let decision = guard.limiter.is_allowed(&key).await;

    if !decision.allowed {
        let retry_after_ms = decision.retry_after_ms(guard.clock.now_ms());
        warn!(class = %guard.class, client = %key, retry_after_ms, "rate limit exceeded");
        return ApiError::RateLimited {
            retry_after_secs: retry_after_secs(retry_after_ms),
        }
        .into_response();
    }

    let mut response = next.run(request).await;
    insert_quota_headers(response.headers_mut(), &decision);
    response
}

/// `<ip>|<user-agent>` for the caller of `request`.
///
/// The address comes from the connection when the server was started with
/// connect info, else from the first `X-Forwarded-For` hop.
pub fn client_key(request: &Request) -> String {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .or_else(|| forwarded_for(request.headers()))
        .unwrap_or_else(|| "unknown".to_string());

    let agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    format!("{ip}|{agent}")
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .map(str::trim)
        .find(|hop| !hop.is_empty())
        .map(str::to_string)
}

/// Whole seconds to wait, rounded up, never less than 1.
fn retry_after_secs(retry_after_ms: u64) -> u64 {
    retry_after_ms.div_ceil(1000).max(1)
}

fn insert_quota_headers(headers: &mut HeaderMap, decision: &RateLimitDecision) {
    headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(
        X_RATELIMIT_RESET,
        HeaderValue::from(decision.reset_time.div_ceil(1000)),
    );
}
