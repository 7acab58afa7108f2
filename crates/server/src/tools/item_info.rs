//! item_info tool implementation.
//!
//! Registry-filtered item lookup: custom/homebrew items resolve locally,
//! everything else goes to the rules wiki.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use lorekeep_client::LoreService;
use lorekeep_core::Error;

/// Input parameters for the item_info tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemInfoParams {
    /// The item name to look up.
    pub name: String,
}

/// Item details from the registry or the rules wiki.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemDetails {
    pub name: String,
    pub description: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub is_custom: bool,
    pub is_magic: bool,
    /// "registry", "fallback", or "wiki".
    pub source: String,
    pub notes: Option<String>,
    pub url: Option<String>,
}

/// Output structure for the item_info tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemInfoOutput {
    pub name: String,
    pub found: bool,
    pub info: Option<ItemDetails>,
}

/// Implementation of the item_info tool.
pub async fn item_info_impl(lore: &LoreService, params: ItemInfoParams) -> Result<CallToolResult, McpError> {
    if params.name.trim().is_empty() {
        return Err(Error::InvalidInput("name cannot be empty".into()).into());
    }

    let info = lore.item_info(&params.name).await.map(|info| ItemDetails {
        name: info.name,
        description: info.description,
        properties: info.properties,
        is_custom: info.is_custom,
        is_magic: info.is_magic,
        source: info.source,
        notes: info.notes,
        url: info.url,
    });

    let output = ItemInfoOutput { name: params.name, found: info.is_some(), info };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
