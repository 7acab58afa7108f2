//! cache_stats tool implementation.
//!
//! Reports entry count and approximate on-disk size.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_core::{CacheStats, Error};

/// Output from the cache_stats tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStatsOutput {
    /// The current cache statistics.
    pub stats: CacheStats,
}

/// Implementation of the cache_stats tool.
pub async fn stats_impl(lore: &LoreService) -> Result<CallToolResult, McpError> {
    let stats = lore.store().stats().await?;

    let output = CacheStatsOutput { stats };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeep_core::{CacheStore, CachedPage, ItemRegistry, Section};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_stats_counts_entries() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ItemRegistry::load(
            dir.path().join("registry.json"),
            dir.path().join("fallback.json"),
        ));
        let store = Arc::new(CacheStore::open(dir.path().join("cache"), 3600, 16).await.unwrap());

        store
            .put(
                "https://wiki.example/wiki/Emon",
                &CachedPage {
                    title: "Emon".into(),
                    url: "https://wiki.example/wiki/Emon".into(),
                    sections: vec![Section { title: "Introduction".into(), content: "Capital city.".into() }],
                    fetched_at: chrono::Utc::now().to_rfc3339(),
                },
            )
            .await
            .unwrap();

        let service = LoreService::new(true, None, None, registry, store);
        let result = stats_impl(&service).await.unwrap();

        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        let output: CacheStatsOutput = serde_json::from_str(text).unwrap();

        assert_eq!(output.stats.entries, 1);
        assert!(output.stats.disk_bytes > 0);
    }
}
