//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::cache::{CachePurgeParams, purge_impl, stats_impl};
use crate::tools::history_check::{HistoryCheckParams, history_check_impl};
use crate::tools::item_info::{ItemInfoParams, item_info_impl};
use crate::tools::lore_lookup::{LoreLookupParams, lookup_impl};
use crate::tools::lore_search::{LoreSearchParams, search_impl};
use lorekeep_client::LoreService;

/// The main MCP server handler for mcp-lore.
#[derive(Clone)]
pub struct McpLoreServer {
    lore: Arc<LoreService>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpLoreServer {
    /// Create a new server handler.
    pub fn new(lore: LoreService) -> Self {
        Self { lore: Arc::new(lore), tool_router: Self::tool_router() }
    }

    /// Fetch a lore page for a topic, cache-first.
    #[tool(
        description = "Look up a campaign lore topic. Returns the page title and sections, serving cached content when fresh. Custom/homebrew names resolve locally and are never fetched."
    )]
    async fn lore_lookup(&self, params: Parameters<LoreLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.lore, params.0).await
    }

    /// Rank a page's sections against a query.
    #[tool(
        description = "Search a lore page's sections for a query. Returns sections ordered by relevance score."
    )]
    async fn lore_search(&self, params: Parameters<LoreSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.lore, params.0).await
    }

    /// Resolve a character's History check with lore-backed recall.
    #[tool(
        description = "Resolve a History check: estimates the DC from the topic, and on success returns graded recall text from the lore wiki or a fallback prompt."
    )]
    async fn history_check(&self, params: Parameters<HistoryCheckParams>) -> Result<CallToolResult, McpError> {
        history_check_impl(&self.lore, params.0).await
    }

    /// Item information, custom registry first.
    #[tool(
        description = "Get item information. Custom/homebrew items come from the local registry; everything else is looked up on the rules wiki."
    )]
    async fn item_info(&self, params: Parameters<ItemInfoParams>) -> Result<CallToolResult, McpError> {
        item_info_impl(&self.lore, params.0).await
    }

    /// Cache entry count and on-disk size.
    #[tool(description = "Report lore cache statistics: entry count and approximate on-disk size.")]
    async fn cache_stats(&self) -> Result<CallToolResult, McpError> {
        stats_impl(&self.lore).await
    }

    /// Purge cache entries.
    #[tool(
        description = "Purge lore cache entries: sweep expired entries, delete one key, or bound the entry count (oldest evicted first)."
    )]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.lore, params.0).await
    }
}

impl ServerHandler for McpLoreServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-lore".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
