//! Cache store operations.
//!
//! One JSON file per entry named by the key hash, plus `index.json` mapping
//! key hashes to lookup metadata. The index is the source of truth for
//! membership and freshness; entry files hold the page payloads.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::CachedPage;
use super::key::{entry_hash, normalize_key};
use crate::Error;

const INDEX_FILE: &str = "index.json";

/// Index metadata for one cached entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexRecord {
    key: String,
    title: String,
    fetched_at: DateTime<Utc>,
}

/// Cache statistics for operator visibility.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheStats {
    /// Number of live index records.
    pub entries: usize,
    /// Approximate bytes used by entry files and the index.
    pub disk_bytes: u64,
    /// Cache directory path.
    pub cache_dir: String,
}

/// File-backed cache store with TTL policy and an entry-count bound.
///
/// Expired entries are treated as misses but stay on disk until
/// [`CacheStore::sweep_expired`] or eviction removes them.
#[derive(Debug)]
pub struct CacheStore {
    dir: PathBuf,
    ttl_secs: i64,
    max_entries: usize,
    index: Mutex<HashMap<String, IndexRecord>>,
}

impl CacheStore {
    /// Open a cache store rooted at `dir`.
    ///
    /// Creates the directory if needed. A corrupt or unreadable index is
    /// logged and treated as empty; it is rebuilt on the next write.
    pub async fn open(dir: impl AsRef<Path>, ttl_secs: i64, max_entries: usize) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        let index = load_index(&dir).await;
        Ok(Self { dir, ttl_secs, max_entries, index: Mutex::new(index) })
    }

    /// Look up a page by key.
    ///
    /// Returns `None` for absent and for expired entries alike. An index
    /// record whose entry file is missing or unreadable is pruned and
    /// reported as a miss.
    pub async fn get(&self, key: &str) -> Result<Option<CachedPage>, Error> {
        let hash = entry_hash(key);
        let mut index = self.index.lock().await;

        let Some(record) = index.get(&hash) else {
            return Ok(None);
        };

        if self.is_expired(record) {
            return Ok(None);
        }

        match tokio::fs::read(self.entry_path(&hash)).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(page) => Ok(Some(page)),
                Err(e) => {
                    tracing::warn!(key, error = %e, "corrupt cache entry, pruning");
                    index.remove(&hash);
                    self.save_index(&index).await?;
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(key, "orphaned index record, pruning");
                index.remove(&hash);
                self.save_index(&index).await?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Write or replace the entry for `key`, stamped with the current time.
    ///
    /// After the write, the oldest entries (by fetch time) are evicted
    /// until the configured entry bound holds.
    pub async fn put(&self, key: &str, page: &CachedPage) -> Result<(), Error> {
        let hash = entry_hash(key);
        let bytes = serde_json::to_vec_pretty(page)?;
        tokio::fs::write(self.entry_path(&hash), bytes).await?;

        let mut index = self.index.lock().await;
        index.insert(
            hash,
            IndexRecord { key: normalize_key(key), title: page.title.clone(), fetched_at: Utc::now() },
        );

        let evicted = self.evict_locked(&mut index, self.max_entries).await?;
        if evicted > 0 {
            tracing::debug!(evicted, "cache entry bound enforced");
        }

        self.save_index(&index).await
    }

    /// Remove the entry for `key`. Idempotent.
    ///
    /// Returns whether an index record was actually removed.
    pub async fn delete(&self, key: &str) -> Result<bool, Error> {
        let hash = entry_hash(key);
        let mut index = self.index.lock().await;

        let removed = index.remove(&hash).is_some();
        if removed {
            self.save_index(&index).await?;
        }
        self.remove_entry_file(&hash).await?;

        Ok(removed)
    }

    /// Remove all expired entries from disk and index.
    ///
    /// Returns the number of removed entries.
    pub async fn sweep_expired(&self) -> Result<u64, Error> {
        let mut index = self.index.lock().await;

        let expired: Vec<String> = index
            .iter()
            .filter(|(_, record)| self.is_expired(record))
            .map(|(hash, _)| hash.clone())
            .collect();

        for hash in &expired {
            self.remove_entry_file(hash).await?;
            index.remove(hash);
        }

        if !expired.is_empty() {
            self.save_index(&index).await?;
            tracing::debug!(count = expired.len(), "swept expired cache entries");
        }

        Ok(expired.len() as u64)
    }

    /// Evict oldest entries until count <= max_entries.
    ///
    /// Returns the number of evicted entries.
    pub async fn evict_to(&self, max_entries: usize) -> Result<u64, Error> {
        let mut index = self.index.lock().await;
        let removed = self.evict_locked(&mut index, max_entries).await?;
        if removed > 0 {
            self.save_index(&index).await?;
        }
        Ok(removed)
    }

    /// Entry count and approximate on-disk size.
    pub async fn stats(&self) -> Result<CacheStats, Error> {
        let entries = self.index.lock().await.len();

        let mut disk_bytes = 0u64;
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        while let Some(entry) = dir.next_entry().await? {
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                disk_bytes += entry.metadata().await?.len();
            }
        }

        Ok(CacheStats { entries, disk_bytes, cache_dir: self.dir.display().to_string() })
    }

    fn is_expired(&self, record: &IndexRecord) -> bool {
        (Utc::now() - record.fetched_at).num_seconds() > self.ttl_secs
    }

    fn entry_path(&self, hash: &str) -> PathBuf {
        self.dir.join(format!("{hash}.json"))
    }

    async fn evict_locked(&self, index: &mut HashMap<String, IndexRecord>, max_entries: usize) -> Result<u64, Error> {
        let mut removed = 0u64;
        while index.len() > max_entries {
            let Some(oldest) = index
                .iter()
                .min_by_key(|(_, record)| record.fetched_at)
                .map(|(hash, _)| hash.clone())
            else {
                break;
            };
            self.remove_entry_file(&oldest).await?;
            index.remove(&oldest);
            removed += 1;
        }
        Ok(removed)
    }

    async fn remove_entry_file(&self, hash: &str) -> Result<(), Error> {
        match tokio::fs::remove_file(self.entry_path(hash)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_index(&self, index: &HashMap<String, IndexRecord>) -> Result<(), Error> {
        let bytes = serde_json::to_vec_pretty(index)?;
        tokio::fs::write(self.dir.join(INDEX_FILE), bytes).await?;
        Ok(())
    }
}

async fn load_index(dir: &Path) -> HashMap<String, IndexRecord> {
    let path = dir.join(INDEX_FILE);
    match tokio::fs::read(&path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "corrupt cache index, starting empty");
                HashMap::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable cache index, starting empty");
            HashMap::new()
        }
    }
}
