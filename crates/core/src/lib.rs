//! Core types and shared functionality for mcp-lore.
//!
//! This crate provides:
//! - TTL cache store with a file-per-entry layout
//! - Custom/homebrew item registry
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;

pub use cache::{CacheStats, CacheStore, CachedPage, Section};
pub use config::AppConfig;
pub use error::Error;
pub use registry::{CustomItem, ItemRegistry, ItemSource};
