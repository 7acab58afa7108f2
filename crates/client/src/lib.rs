//! Client code for mcp-lore.
//!
//! This crate provides the wiki fetch pipeline, page/section parsing,
//! relevance ranking, and the lore service facade shared by the server.

pub mod fetch;
pub mod history;
pub mod lore;
pub mod parse;
pub mod rank;
pub mod wiki;

pub use fetch::{FetchConfig, HttpSource, PageSource};
pub use lore::{ItemInfo, LoreService};
pub use rank::{RankedSection, rank_sections};
pub use wiki::{Lookup, WikiClient};
