//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-lore server.
#![allow(unused_imports)]

pub mod cache;
pub mod history_check;
pub mod item_info;
pub mod lore_lookup;
pub mod lore_search;

pub use history_check::{HistoryCheckOutput, HistoryCheckParams};
pub use item_info::{ItemInfoOutput, ItemInfoParams};
pub use lore_lookup::{LoreLookupOutput, LoreLookupParams};
pub use lore_search::{LoreSearchOutput, LoreSearchParams};
