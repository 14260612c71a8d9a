//! Limiter Registry
//!
//! One independent limiter per traffic class.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::ratelimit::{RateLimitConfig, RateLimiter, SharedRateLimiter};

// == Limiter Class ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimiterClass {
    /// Ordinary reads and writes
    General,
    /// Sign-in and credential endpoints
    Auth,
    /// Bulk or destructive operations
    Sensitive,
}

impl LimiterClass {
    pub const ALL: [LimiterClass; 3] = [
        LimiterClass::General,
        LimiterClass::Auth,
        LimiterClass::Sensitive,
    ];

    pub const fn default_config(self) -> RateLimitConfig {
        match self {
            LimiterClass::General => RateLimitConfig::new(Duration::from_secs(15 * 60), 100),
            LimiterClass::Auth => RateLimitConfig::new(Duration::from_secs(15 * 60), 5),
            LimiterClass::Sensitive => RateLimitConfig::new(Duration::from_secs(60 * 60), 10),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LimiterClass::General => "general",
            LimiterClass::Auth => "auth",
            LimiterClass::Sensitive => "sensitive",
        }
    }
}

impl fmt::Display for LimiterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Limiter Set Config ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitersConfig {
    pub general: RateLimitConfig,
    pub auth: RateLimitConfig,
    pub sensitive: RateLimitConfig,
}

impl Default for RateLimitersConfig {
    fn default() -> Self {
        Self {
            general: LimiterClass::General.default_config(),
            auth: LimiterClass::Auth.default_config(),
            sensitive: LimiterClass::Sensitive.default_config(),
        }
    }
}

// == Rate Limiters ==
/// Cloneable set of per-class limiters.
#[derive(Debug, Clone)]
pub struct RateLimiters {
    general: SharedRateLimiter,
    auth: SharedRateLimiter,
    sensitive: SharedRateLimiter,
    clock: Arc<dyn Clock>,
}

impl RateLimiters {
    pub fn new(config: RateLimitersConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitersConfig, clock: Arc<dyn Clock>) -> Self {
        let build = |c: RateLimitConfig| SharedRateLimiter::new(RateLimiter::with_clock(c, clock.clone()));
        Self {
            general: build(config.general),
            auth: build(config.auth),
            sensitive: build(config.sensitive),
            clock,
        }
    }

    /// Clock every class reads its windows from.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn get(&self, class: LimiterClass) -> &SharedRateLimiter {
        match class {
            LimiterClass::General => &self.general,
            LimiterClass::Auth => &self.auth,
            LimiterClass::Sensitive => &self.sensitive,
        }
    }

    /// Sweeps every class. Returns the total number of records removed.
    pub async fn cleanup(&self) -> usize {
        let mut removed = 0;
        for class in LimiterClass::ALL {
            removed += self.get(class).cleanup().await;
        }
        removed
    }

    /// Number of tracked clients per class.
    pub async fn tracked_clients(&self) -> Vec<(LimiterClass, usize)> {
        let mut counts = Vec::with_capacity(LimiterClass::ALL.len());
        for class in LimiterClass::ALL {
            counts.push((class, self.get(class).len().await));
        }
        counts
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new(RateLimitersConfig::default())
    }
}
