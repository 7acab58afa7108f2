//! lore_search tool implementation.
//!
//! Fetches a page and ranks its sections against a query.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_core::Error;

/// Input parameters for the lore_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoreSearchParams {
    /// The page topic to search within.
    pub topic: String,

    /// What to look for.
    pub query: String,

    /// Maximum number of sections to return (default: 3).
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    3
}

/// A section with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SectionMatch {
    pub title: String,
    pub content: String,
    pub score: f32,
}

/// Output structure for the lore_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoreSearchOutput {
    pub topic: String,
    pub query: String,
    /// Whether the page was available at all.
    pub found: bool,
    /// Page title, when available.
    pub title: Option<String>,
    /// Sections ordered by descending score.
    pub results: Vec<SectionMatch>,
}

/// Implementation of the lore_search tool.
pub async fn search_impl(lore: &LoreService, params: LoreSearchParams) -> Result<CallToolResult, McpError> {
    if params.topic.trim().is_empty() {
        return Err(Error::InvalidInput("topic cannot be empty".into()).into());
    }
    if params.query.trim().is_empty() {
        return Err(Error::InvalidInput("query cannot be empty".into()).into());
    }

    let output = match lore.search(&params.topic, &params.query, params.max_results).await {
        Some((title, matches)) => LoreSearchOutput {
            topic: params.topic,
            query: params.query,
            found: true,
            title: Some(title),
            results: matches
                .into_iter()
                .map(|m| SectionMatch { title: m.section.title, content: m.section.content, score: m.score })
                .collect(),
        },
        None => LoreSearchOutput {
            topic: params.topic,
            query: params.query,
            found: false,
            title: None,
            results: Vec::new(),
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeep_core::{CacheStore, ItemRegistry};
    use std::sync::Arc;

    async fn bare_service() -> (tempfile::TempDir, LoreService) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ItemRegistry::load(
            dir.path().join("registry.json"),
            dir.path().join("fallback.json"),
        ));
        let store = Arc::new(CacheStore::open(dir.path().join("cache"), 3600, 16).await.unwrap());
        let service = LoreService::new(true, None, None, registry, store);
        (dir, service)
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let (_dir, service) = bare_service().await;
        let params = LoreSearchParams { topic: "Whitestone".into(), query: " ".into(), max_results: 3 };
        assert!(search_impl(&service, params).await.is_err());
    }

    #[tokio::test]
    async fn test_search_without_client_not_found() {
        let (_dir, service) = bare_service().await;
        let params = LoreSearchParams { topic: "Whitestone".into(), query: "history".into(), max_results: 3 };
        let result = search_impl(&service, params).await.unwrap();

        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        let output: LoreSearchOutput = serde_json::from_str(text).unwrap();

        assert!(!output.found);
        assert!(output.results.is_empty());
    }
}
