//! File-backed TTL cache for fetched wiki pages.
//!
//! This module provides a persistent cache using one JSON file per entry
//! plus a JSON index, all inside a single cache directory. It supports:
//!
//! - Content-addressed entry files using SHA-256 key hashing
//! - TTL-based freshness checks (stale entries miss but stay on disk)
//! - Oldest-first eviction when the entry count bound is exceeded
//! - Recovery from a corrupt index (treated as empty, rebuilt on write)

pub mod key;
pub mod store;

pub use crate::Error;

use serde::{Deserialize, Serialize};

pub use store::{CacheStats, CacheStore};

/// A cached wiki page.
///
/// The payload stored for a lookup key. Immutable once written; a refetch
/// replaces the whole entry.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CachedPage {
    pub title: String,
    pub url: String,
    pub sections: Vec<Section>,
    /// ISO8601 timestamp of retrieval.
    pub fetched_at: String,
}

/// A titled chunk of page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Section {
    pub title: String,
    pub content: String,
}
