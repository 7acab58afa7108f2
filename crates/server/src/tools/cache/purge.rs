//! cache_purge tool implementation.
//!
//! Purges cache entries by expiry, key, or count bound.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_core::Error;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Sweep all expired entries.
    #[serde(default)]
    pub expired: Option<bool>,

    /// Delete the entry for this lookup key.
    #[serde(default)]
    pub key: Option<String>,

    /// Keep only the newest N entries (oldest evicted first).
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(lore: &LoreService, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.expired.is_none() && params.key.is_none() && params.max_entries.is_none() {
        return Err(Error::InvalidInput(
            "At least one of expired, key, or max_entries must be specified".to_string(),
        )
        .into());
    }

    let store = lore.store();
    let mut deleted_total = 0u64;

    if params.expired == Some(true) {
        deleted_total += store.sweep_expired().await?;
    }

    if let Some(key) = params.key {
        if store.delete(&key).await? {
            deleted_total += 1;
        }
    }

    if let Some(max_entries) = params.max_entries {
        deleted_total += store.evict_to(max_entries).await?;
    }

    let output = CachePurgeOutput { deleted: deleted_total };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeep_core::{CacheStore, CachedPage, ItemRegistry, Section};
    use std::sync::Arc;

    async fn service_with_pages(keys: &[&str]) -> (tempfile::TempDir, LoreService) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ItemRegistry::load(
            dir.path().join("registry.json"),
            dir.path().join("fallback.json"),
        ));
        let store = Arc::new(CacheStore::open(dir.path().join("cache"), 3600, 16).await.unwrap());

        for key in keys {
            store
                .put(
                    key,
                    &CachedPage {
                        title: key.to_string(),
                        url: format!("https://wiki.example/wiki/{key}"),
                        sections: vec![Section { title: "Introduction".into(), content: "Text.".into() }],
                        fetched_at: chrono::Utc::now().to_rfc3339(),
                    },
                )
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        (dir, LoreService::new(true, None, None, registry, store))
    }

    fn parse_output(result: &CallToolResult) -> CachePurgeOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_purge_no_params() {
        let (_dir, service) = service_with_pages(&[]).await;
        let params = CachePurgeParams { expired: None, key: None, max_entries: None };
        assert!(purge_impl(&service, params).await.is_err());
    }

    #[tokio::test]
    async fn test_purge_by_key() {
        let (_dir, service) = service_with_pages(&["Emon", "Whitestone"]).await;
        let params = CachePurgeParams { expired: None, key: Some("Emon".into()), max_entries: None };

        let result = purge_impl(&service, params).await.unwrap();
        assert_eq!(parse_output(&result).deleted, 1);
        assert_eq!(service.store().stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_purge_absent_key_deletes_nothing() {
        let (_dir, service) = service_with_pages(&["Emon"]).await;
        let params = CachePurgeParams { expired: None, key: Some("Nowhere".into()), max_entries: None };

        let result = purge_impl(&service, params).await.unwrap();
        assert_eq!(parse_output(&result).deleted, 0);
    }

    #[tokio::test]
    async fn test_purge_to_entry_bound() {
        let (_dir, service) = service_with_pages(&["Emon", "Whitestone", "Vasselheim"]).await;
        let params = CachePurgeParams { expired: None, key: None, max_entries: Some(1) };

        let result = purge_impl(&service, params).await.unwrap();
        assert_eq!(parse_output(&result).deleted, 2);
        assert_eq!(service.store().stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_purge_expired_with_nothing_expired() {
        let (_dir, service) = service_with_pages(&["Emon"]).await;
        let params = CachePurgeParams { expired: Some(true), key: None, max_entries: None };

        let result = purge_impl(&service, params).await.unwrap();
        assert_eq!(parse_output(&result).deleted, 0);
        assert_eq!(service.store().stats().await.unwrap().entries, 1);
    }
}
