//! lore_lookup tool implementation.
//!
//! Fetches a lore page through the custom-filter -> cache -> fetch flow.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_core::{CachedPage, CustomItem, Error};

/// Input parameters for the lore_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoreLookupParams {
    /// The topic to look up (e.g. a location, faction, or event name).
    pub topic: String,

    /// Force a refresh, bypassing the cache.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Output structure for the lore_lookup tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LoreLookupOutput {
    /// The topic as requested.
    pub topic: String,
    /// "page", "custom", or "none".
    pub outcome: String,
    /// The page, when the topic resolved externally or from cache.
    pub page: Option<CachedPage>,
    /// The local record, when the topic names custom/homebrew content.
    pub item: Option<CustomItem>,
}

/// Implementation of the lore_lookup tool.
pub async fn lookup_impl(lore: &LoreService, params: LoreLookupParams) -> Result<CallToolResult, McpError> {
    if params.topic.trim().is_empty() {
        return Err(Error::InvalidInput("topic cannot be empty".into()).into());
    }

    if let Some((item, _)) = lore.registry().get_item(&params.topic) {
        let output = LoreLookupOutput {
            topic: params.topic,
            outcome: "custom".into(),
            page: None,
            item: Some(item.clone()),
        };
        return to_result(&output);
    }

    let output = match lore.lore_page(&params.topic, params.force_refresh).await {
        Some(page) => LoreLookupOutput { topic: params.topic, outcome: "page".into(), page: Some(page), item: None },
        None => LoreLookupOutput { topic: params.topic, outcome: "none".into(), page: None, item: None },
    };

    to_result(&output)
}

fn to_result(output: &LoreLookupOutput) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
