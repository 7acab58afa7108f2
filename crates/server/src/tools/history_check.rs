//! history_check tool implementation.
//!
//! Resolves a character's History check with lore-backed recall.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_client::history::handle_history_check;
use lorekeep_core::Error;

/// Input parameters for the history_check tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryCheckParams {
    /// What the character is trying to recall (location, event, person, ...).
    pub topic: String,

    /// The d20 + modifier result.
    pub check_result: i32,

    /// Name of the character making the check.
    #[serde(default)]
    pub character_name: Option<String>,
}

/// Output structure for the history_check tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HistoryCheckOutput {
    pub success: bool,
    pub check_result: i32,
    /// The DC that was needed, estimated from the topic's wording.
    pub dc: i32,
    /// What the character recalls.
    pub information: String,
    /// "wiki", "fallback", or "failure".
    pub source: String,
    pub detail_level: Option<String>,
}

/// Implementation of the history_check tool.
pub async fn history_check_impl(lore: &LoreService, params: HistoryCheckParams) -> Result<CallToolResult, McpError> {
    if params.topic.trim().is_empty() {
        return Err(Error::InvalidInput("topic cannot be empty".into()).into());
    }

    let outcome =
        handle_history_check(lore, &params.topic, params.check_result, params.character_name.as_deref()).await;

    let output = HistoryCheckOutput {
        success: outcome.success,
        check_result: outcome.check_result,
        dc: outcome.dc,
        information: outcome.information,
        source: outcome.source,
        detail_level: outcome.detail_level,
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

    fn parse_output(result: &CallToolResult) -> HistoryCheckOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_failed_check() {
        let (_dir, service) = bare_service().await;
        let params = HistoryCheckParams {
            topic: "Trade routes of Emon".into(),
            check_result: 5,
            character_name: None,
        };

        let result = history_check_impl(&service, params).await.unwrap();
        let output = parse_output(&result);

        assert!(!output.success);
        assert_eq!(output.dc, 15);
        assert_eq!(output.source, "failure");
    }

    #[tokio::test]
    async fn test_successful_check_without_lore_falls_back() {
        let (_dir, service) = bare_service().await;
        let params = HistoryCheckParams {
            topic: "The Laughing Tavern".into(),
            check_result: 18,
            character_name: Some("Lysara".into()),
        };

        let result = history_check_impl(&service, params).await.unwrap();
        let output = parse_output(&result);

        assert!(output.success);
        assert_eq!(output.dc, 10);
        assert_eq!(output.source, "fallback");
        assert_eq!(output.detail_level.as_deref(), Some("detailed"));
    }

    #[tokio::test]
    async fn test_empty_topic() {
        let (_dir, service) = bare_service().await;
        let params = HistoryCheckParams { topic: "".into(), check_result: 10, character_name: None };
        assert!(history_check_impl(&service, params).await.is_err());
    }
}
