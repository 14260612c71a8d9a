//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheTtl;
use crate::ratelimit::{LimiterClass, RateLimitConfig, RateLimitersConfig};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for entries stored without one
    pub default_ttl: u64,
    /// Cache capacity, `None` = unbounded
    pub max_entries: Option<usize>,
    /// Cache sweep interval in seconds
    pub cache_sweep_interval: u64,
    /// Rate limit sweep interval in seconds
    pub rate_limit_sweep_interval: u64,
    /// Per-class rate limits
    pub rate_limits: RateLimitersConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Cache capacity (default: unbounded)
    /// - `CACHE_SWEEP_INTERVAL` - Cache sweep frequency in seconds (default: 600)
    /// - `RATE_LIMIT_SWEEP_INTERVAL` - Rate limit sweep frequency in seconds (default: 300)
    /// - `RATE_LIMIT_{GENERAL,AUTH,SENSITIVE}_WINDOW` - Window in seconds
    /// - `RATE_LIMIT_{GENERAL,AUTH,SENSITIVE}_MAX` - Requests per window
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.default_ttl),
            max_entries: env_parse("CACHE_MAX_ENTRIES"),
            cache_sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.cache_sweep_interval),
            rate_limit_sweep_interval: env_or(
                "RATE_LIMIT_SWEEP_INTERVAL",
                defaults.rate_limit_sweep_interval,
            ),
            rate_limits: RateLimitersConfig {
                general: limit_from_env(LimiterClass::General),
                auth: limit_from_env(LimiterClass::Auth),
                sensitive: limit_from_env(LimiterClass::Sensitive),
            },
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_interval)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: CacheTtl::Medium.duration().as_secs(),
            max_entries: None,
            cache_sweep_interval: 600,
            rate_limit_sweep_interval: 300,
            rate_limits: RateLimitersConfig::default(),
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env_parse(name).unwrap_or(default)
}

fn limit_from_env(class: LimiterClass) -> RateLimitConfig {
    let defaults = class.default_config();
    let prefix = class.as_str().to_uppercase();

    let window_secs = env_or(
        &format!("RATE_LIMIT_{prefix}_WINDOW"),
        defaults.window.as_secs(),
    );
    let max_requests = env_or(&format!("RATE_LIMIT_{prefix}_MAX"), defaults.max_requests);

    RateLimitConfig::new(Duration::from_secs(window_secs), max_requests)
}
