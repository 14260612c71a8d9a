//! Cache Key Conventions
//!
//! Builders for the keys route code stores reads under. List keys and item
//! keys of one resource share the `<resource>:` prefix, so a single
//! [`invalidate_by_prefix`] call drops every cached variant after a write.
//!
//! [`invalidate_by_prefix`]: crate::cache::CacheStore::invalidate_by_prefix

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

// == TTL Tiers ==
/// Staleness tolerance classes for cached reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTtl {
    /// Volatile listings
    Short,
    /// Single resources
    Medium,
    Long,
    /// Rarely changing reference data
    VeryLong,
}

impl CacheTtl {
    pub const fn duration(self) -> Duration {
        match self {
            CacheTtl::Short => Duration::from_secs(60),
            CacheTtl::Medium => Duration::from_secs(5 * 60),
            CacheTtl::Long => Duration::from_secs(15 * 60),
            CacheTtl::VeryLong => Duration::from_secs(60 * 60),
        }
    }
}

impl From<CacheTtl> for Duration {
    fn from(ttl: CacheTtl) -> Self {
        ttl.duration()
    }
}

// == Sort Order ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

// == List Query ==
/// Pagination, sort and filter parameters of a list read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_field: String,
    pub sort_order: SortOrder,
    /// Free-form filter text, empty when unfiltered
    pub filter: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            sort_field: "created_at".to_string(),
            sort_order: SortOrder::Asc,
            filter: String::new(),
        }
    }
}

/// `<resource>:` — the prefix shared by every key of `resource`.
pub fn resource_prefix(resource: &str) -> String {
    format!("{resource}:")
}

/// `<resource>:<page>:<limit>:<sortField>:<sortOrder>:<filter>`
pub fn list_key(resource: &str, query: &ListQuery) -> String {
    format!(
        "{resource}:{}:{}:{}:{}:{}",
        query.page, query.limit, query.sort_field, query.sort_order, query.filter
    )
}

/// `<resource>:<id>`
pub fn item_key(resource: &str, id: impl fmt::Display) -> String {
    format!("{resource}:{id}")
}
