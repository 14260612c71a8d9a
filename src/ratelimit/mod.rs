//! Rate Limit Module
//!
//! Fixed-window request limiting per client key, one limiter per traffic
//! class.

mod limiter;
mod record;
mod registry;


pub use limiter::{RateLimitConfig, RateLimitDecision, RateLimiter, SharedRateLimiter};
pub use record::RateLimitRecord;
pub use registry::{LimiterClass, RateLimiters, RateLimitersConfig};
