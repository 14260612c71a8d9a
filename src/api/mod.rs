//! API Module
//!
//! HTTP handlers, rate limit middleware and routing.
//!
//! # Endpoints
//! - `GET /health` - Health check
//! - `GET /stats` - Cache and limiter statistics
//! - `PUT /cache` - Store a value
//! - `GET /cache/:key` - Retrieve a value
//! - `DELETE /cache/:key` - Delete a value
//! - `POST /admin/invalidate` - Invalidate by key prefix
//! - `POST /admin/clear` - Drop every entry

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{client_key, enforce_rate_limit, RateLimitGuard};
pub use routes::create_router;
