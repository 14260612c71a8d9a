//! Back-office cache
//!
//! In-process TTL cache with cache-aside reads and prefix invalidation, plus
//! per-class fixed-window rate limiting, both swept by background tasks.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod ratelimit;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStore, SharedCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use ratelimit::{LimiterClass, RateLimiter, RateLimiters};
pub use tasks::{spawn_sweep_task, SweepHandle};
