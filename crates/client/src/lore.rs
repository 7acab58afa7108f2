//! Lore service facade for the narrative generator.
//!
//! Owns the lore and rules wiki clients over one shared cache and the
//! custom-item registry. Every operation here is fail-soft: transport and
//! storage errors are logged and collapse to an empty result, so prompt
//! assembly can always proceed without lore context.

use std::sync::Arc;

use serde::Serialize;

use crate::fetch::{FetchConfig, HttpSource, PageSource};
use crate::rank::{RankedSection, rank_sections};
use crate::wiki::{Lookup, WikiClient};
use lorekeep_core::{AppConfig, CacheStore, CachedPage, Error, ItemRegistry};

/// Item information from the registry or the rules wiki.
#[derive(Debug, Clone, Serialize)]
pub struct ItemInfo {
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

/// Wiki knowledge facade: lore lookups, section search, history checks,
/// and registry-filtered item information.
pub struct LoreService {
    enabled: bool,
    lore: Option<WikiClient>,
    rules: Option<WikiClient>,
    registry: Arc<ItemRegistry>,
    store: Arc<CacheStore>,
}

impl LoreService {
    /// Build the service from configuration.
    ///
    /// The cache store and registry are always opened so operator tooling
    /// works even when retrieval is disabled; wiki clients exist only for
    /// the base URLs that are configured.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let registry = Arc::new(ItemRegistry::load(&config.registry_path, &config.fallback_registry_path));
        let store = Arc::new(
            CacheStore::open(&config.cache_dir, config.cache_ttl_secs, config.max_cache_entries).await?,
        );

        if !config.enabled {
            tracing::info!("lore retrieval disabled");
            return Ok(Self::new(false, None, None, registry, store));
        }

        let source: Arc<dyn PageSource> = Arc::new(HttpSource::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        })?);

        let make_client = |base_url: &str| {
            WikiClient::new(
                base_url,
                source.clone(),
                store.clone(),
                registry.clone(),
                config.ranking.clone(),
                config.min_relevance,
            )
        };

        let lore = if config.lore_base_url.is_empty() {
            tracing::warn!("lore_base_url not set, lore lookups disabled");
            None
        } else {
            tracing::info!(base_url = %config.lore_base_url, "lore wiki client ready");
            Some(make_client(&config.lore_base_url))
        };

        let rules = if config.rules_base_url.is_empty() {
            tracing::warn!("rules_base_url not set, item and rules lookups disabled");
            None
        } else {
            tracing::info!(base_url = %config.rules_base_url, "rules wiki client ready");
            Some(make_client(&config.rules_base_url))
        };

        if !registry.is_empty() {
            tracing::info!(custom_items = registry.len(), "custom content will not be looked up externally");
        }

        Ok(Self::new(true, lore, rules, registry, store))
    }

    /// Assemble a service from parts. Used by tests and embedders that
    /// bring their own page source.
    pub fn new(
        enabled: bool, lore: Option<WikiClient>, rules: Option<WikiClient>, registry: Arc<ItemRegistry>,
        store: Arc<CacheStore>,
    ) -> Self {
        Self { enabled, lore, rules, registry, store }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ItemRegistry> {
        &self.registry
    }

    /// Fetch a lore page, collapsing every failure to `None`.
    pub async fn lore_page(&self, topic: &str, force_refresh: bool) -> Option<CachedPage> {
        if !self.enabled {
            return None;
        }
        lookup(self.lore.as_ref(), topic, force_refresh).await
    }

    /// Fenced lore context block for a location, or empty.
    pub async fn location_context(&self, location: &str, max_sections: usize) -> String {
        let Some(page) = self.lore_page(location, false).await else {
            return String::new();
        };

        let mut context = format!("\n\n=== LORE CONTEXT: {} ===\n", page.title);
        for section in page.sections.iter().take(max_sections) {
            context.push_str(&format!("\n{}:\n{}\n", section.title, section.content));
        }
        context.push_str("=== END LORE CONTEXT ===\n\n");
        context
    }

    /// Search several pages for sections relevant to `query`, formatted as
    /// one fenced context block. Empty when nothing relevant is found.
    pub async fn query_context(&self, query: &str, pages: &[String], max_results: usize) -> String {
        let Some(client) = self.lore.as_ref().filter(|_| self.enabled) else {
            return String::new();
        };

        let mut context = format!("\n\n=== LORE CONTEXT FOR: {query} ===\n");
        let mut found_any = false;

        for topic in pages {
            let Some(page) = lookup(Some(client), topic, false).await else {
                continue;
            };
            let matches = rank_sections(query, &page.sections, client.ranking(), client.min_relevance(), max_results);
            if matches.is_empty() {
                continue;
            }

            found_any = true;
            context.push_str(&format!("\nFrom {}:\n", page.title));
            for m in &matches {
                context.push_str(&format!("\n{}:\n{}\n", m.section.title, m.section.content));
            }
        }

        if !found_any {
            return String::new();
        }

        context.push_str("\n=== END LORE CONTEXT ===\n\n");
        context
    }

    /// Rank one page's sections against `query`.
    ///
    /// Returns the page title and the ranked sections, or `None` when the
    /// page is unavailable.
    pub async fn search(&self, topic: &str, query: &str, max_results: usize) -> Option<(String, Vec<RankedSection>)> {
        if !self.enabled {
            return None;
        }
        let client = self.lore.as_ref()?;
        let page = lookup(Some(client), topic, false).await?;
        let matches = rank_sections(query, &page.sections, client.ranking(), client.min_relevance(), max_results);
        Some((page.title, matches))
    }

    /// Recall text for a successful History check.
    ///
    /// The check result grades how much of the page the character recalls:
    /// below 10 one section, below 15 two, below 20 three, otherwise all.
    pub async fn history_check_info(&self, topic: &str, check_result: i32) -> Option<String> {
        let page = self.lore_page(topic, false).await?;

        let count = if check_result < 10 {
            1
        } else if check_result < 15 {
            2
        } else if check_result < 20 {
            3
        } else {
            page.sections.len()
        };

        let mut info = format!("You recall the following about {}:\n\n", page.title);
        for section in page.sections.iter().take(count) {
            info.push_str(&format!("{}:\n{}\n\n", section.title, section.content));
        }
        Some(info)
    }

    /// Item information, registry first.
    ///
    /// A name in the explicit registry or the fallback list resolves
    /// locally and is never fetched; anything else is assumed official and
    /// looked up on the rules wiki.
    pub async fn item_info(&self, name: &str) -> Option<ItemInfo> {
        if !self.enabled {
            return None;
        }

        if let Some((item, source)) = self.registry.get_item(name) {
            return Some(ItemInfo {
                name: item.name.clone(),
                description: item.description.clone(),
                properties: item.properties.clone(),
                is_custom: true,
                is_magic: item.is_magic,
                source: source.as_str().to_string(),
                notes: Some(item.notes.clone()).filter(|notes| !notes.is_empty()),
                url: None,
            });
        }

        let page = lookup(self.rules.as_ref(), name, false).await?;

        let mut description = String::new();
        let mut properties = serde_json::Map::new();
        for section in &page.sections {
            match section.title.to_lowercase().as_str() {
                "description" | "overview" | "summary" => description = section.content.clone(),
                _ => {
                    properties.insert(
                        section.title.clone(),
                        serde_json::Value::String(section.content.clone()),
                    );
                }
            }
        }

        Some(ItemInfo {
            name: page.title.clone(),
            description,
            properties,
            is_custom: false,
            is_magic: name.to_lowercase().contains("magic"),
            source: "wiki".to_string(),
            notes: None,
            url: Some(page.url),
        })
    }
}

/// Run a lookup on an optional client, collapsing every non-page outcome
/// (missing client, custom content, no page, transport error) to `None`.
async fn lookup(client: Option<&WikiClient>, topic: &str, force_refresh: bool) -> Option<CachedPage> {
    let client = client?;
    match client.fetch_page(topic, force_refresh).await {
        Ok(Lookup::Page(page)) => Some(page),
        Ok(Lookup::Custom(_)) | Ok(Lookup::NotFound) => None,
        Err(e) => {
            tracing::warn!(topic, error = %e, "lookup failed, continuing without lore");
            None
        }
    }
}
