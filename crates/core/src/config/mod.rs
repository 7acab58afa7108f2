//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_LORE_*)
//! 2. TOML config file (if MCP_LORE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_LORE_*)
/// 2. TOML config file (if MCP_LORE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Master switch for external lore retrieval.
    ///
    /// Set via MCP_LORE_ENABLED environment variable. When false, every
    /// lookup degrades to an empty result without touching the network.
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the campaign lore wiki (locations, NPCs, history).
    ///
    /// Set via MCP_LORE_LORE_BASE_URL environment variable.
    /// Empty disables lore lookups.
    #[serde(default)]
    pub lore_base_url: String,

    /// Base URL of the rules wiki (items, spells, mechanics).
    ///
    /// Set via MCP_LORE_RULES_BASE_URL environment variable.
    /// Empty disables item/rules lookups.
    #[serde(default)]
    pub rules_base_url: String,

    /// Directory holding cached page entries and the cache index.
    ///
    /// Set via MCP_LORE_CACHE_DIR environment variable.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Time-to-live for cached pages, in seconds.
    ///
    /// Set via MCP_LORE_CACHE_TTL_SECS environment variable (default: 7 days).
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,

    /// Maximum number of cached pages before oldest-first eviction.
    ///
    /// Set via MCP_LORE_MAX_CACHE_ENTRIES environment variable.
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,

    /// Minimum relevance score for a section to appear in search results.
    ///
    /// Set via MCP_LORE_MIN_RELEVANCE environment variable.
    #[serde(default = "default_min_relevance")]
    pub min_relevance: f32,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_LORE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MCP_LORE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to fetch per request.
    ///
    /// Set via MCP_LORE_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Path to the explicit custom-item registry document.
    ///
    /// Set via MCP_LORE_REGISTRY_PATH environment variable.
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Path to the lower-precedence fallback item document.
    ///
    /// Set via MCP_LORE_FALLBACK_REGISTRY_PATH environment variable.
    #[serde(default = "default_fallback_registry_path")]
    pub fallback_registry_path: PathBuf,

    /// Section ranking weights.
    ///
    /// Nested keys via MCP_LORE_RANKING__* environment variables.
    #[serde(default)]
    pub ranking: RankingWeights,
}

/// Weights for the section relevance heuristic.
///
/// The section score is `title_phrase` when the whole query appears in the
/// section title, plus `title_word` per query word shared with the title,
/// plus `body_word` per query word shared with the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingWeights {
    #[serde(default = "default_title_phrase")]
    pub title_phrase: f32,

    #[serde(default = "default_title_word")]
    pub title_word: f32,

    #[serde(default = "default_body_word")]
    pub body_word: f32,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./.lore_cache")
}

fn default_cache_ttl_secs() -> i64 {
    604_800 // 7 days
}

fn default_max_cache_entries() -> usize {
    256
}

fn default_min_relevance() -> f32 {
    0.1
}

fn default_user_agent() -> String {
    "mcp-lore/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("game_data/items/custom_items_registry.json")
}

fn default_fallback_registry_path() -> PathBuf {
    PathBuf::from("game_data/items/fallback_items.json")
}

fn default_title_phrase() -> f32 {
    2.0
}

fn default_title_word() -> f32 {
    0.5
}

fn default_body_word() -> f32 {
    0.1
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            title_phrase: default_title_phrase(),
            title_word: default_title_word(),
            body_word: default_body_word(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            lore_base_url: String::new(),
            rules_base_url: String::new(),
            cache_dir: default_cache_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_cache_entries: default_max_cache_entries(),
            min_relevance: default_min_relevance(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            registry_path: default_registry_path(),
            fallback_registry_path: default_fallback_registry_path(),
            ranking: RankingWeights::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_LORE_`
    /// 2. TOML file from `MCP_LORE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_LORE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_LORE_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
