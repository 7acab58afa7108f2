//! Wiki lookup client: custom-item filter, cache, fetch, parse, store.
//!
//! Lookup order for a topic: the custom-item registry short-circuits with
//! local data, then the cache is consulted, and only then does a network
//! fetch happen. Transport failures surface as `Err` here so callers can
//! tell "no such page" from "could not ask"; the lore service collapses
//! both to an empty result.

use std::sync::Arc;

use chrono::Utc;

use crate::fetch::{PageSource, page_url};
use crate::parse::parse_page;
use crate::rank::{RankedSection, rank_sections};
use lorekeep_core::config::RankingWeights;
use lorekeep_core::{CacheStore, CachedPage, CustomItem, Error, ItemRegistry};

/// Outcome of a topic lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// A page, freshly fetched or from the cache.
    Page(CachedPage),
    /// The topic names user-defined content; local record returned instead.
    Custom(CustomItem),
    /// The external source has no page for this topic.
    NotFound,
}

/// Caching wiki client bound to one base URL.
pub struct WikiClient {
    base_url: String,
    source: Arc<dyn PageSource>,
    store: Arc<CacheStore>,
    registry: Arc<ItemRegistry>,
    ranking: RankingWeights,
    min_relevance: f32,
}

impl WikiClient {
    pub fn new(
        base_url: impl Into<String>, source: Arc<dyn PageSource>, store: Arc<CacheStore>,
        registry: Arc<ItemRegistry>, ranking: RankingWeights, min_relevance: f32,
    ) -> Self {
        Self { base_url: base_url.into(), source, store, registry, ranking, min_relevance }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ranking(&self) -> &RankingWeights {
        &self.ranking
    }

    pub fn min_relevance(&self) -> f32 {
        self.min_relevance
    }

    /// Look up a topic.
    ///
    /// `force_refresh` bypasses the cache read; the fetched result is still
    /// written back. Custom/homebrew names never reach the network.
    pub async fn fetch_page(&self, topic: &str, force_refresh: bool) -> Result<Lookup, Error> {
        if let Some((item, source)) = self.registry.get_item(topic) {
            tracing::info!(topic, source = source.as_str(), "blocked external lookup for custom content");
            return Ok(Lookup::Custom(item.clone()));
        }

        let url = page_url(&self.base_url, topic).map_err(|e| Error::InvalidTopic(e.to_string()))?;

        if !force_refresh
            && let Some(page) = self.store.get(url.as_str()).await?
        {
            tracing::debug!(topic, "cache hit");
            return Ok(Lookup::Page(page));
        }

        tracing::debug!(topic, %url, "fetching");
        let Some(html) = self.source.get(&url).await? else {
            tracing::info!(topic, "no page for topic");
            return Ok(Lookup::NotFound);
        };

        let Some(parsed) = parse_page(&html, topic) else {
            tracing::warn!(topic, "no recognizable content on page");
            return Ok(Lookup::NotFound);
        };

        let page = CachedPage {
            title: parsed.title,
            url: url.to_string(),
            sections: parsed.sections,
            fetched_at: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        };

        self.store.put(url.as_str(), &page).await?;
        tracing::info!(topic, sections = page.sections.len(), "fetched and cached");

        Ok(Lookup::Page(page))
    }

    /// Fetch a topic and rank its sections against `query`.
    ///
    /// Custom and missing topics yield no sections.
    pub async fn search_sections(&self, topic: &str, query: &str, max_results: usize) -> Result<Vec<RankedSection>, Error> {
        match self.fetch_page(topic, false).await? {
            Lookup::Page(page) => {
                Ok(rank_sections(query, &page.sections, &self.ranking, self.min_relevance, max_results))
            }
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::source::testing::MockSource;

    const PAGE_HTML: &str = r#"
        <html><body>
            <h1 id="firstHeading">Whitestone</h1>
            <div class="mw-parser-output">
                <p>Whitestone is a city in the north.</p>
                <h2>History</h2>
                <p>The city endured a long occupation.</p>
            </div>
        </body></html>
    "#;

    async fn test_store() -> (tempfile::TempDir, Arc<CacheStore>) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CacheStore::open(dir.path(), 3600, 16).await.unwrap());
        (dir, store)
    }

    fn registry_at(dir: &std::path::Path) -> Arc<ItemRegistry> {
        Arc::new(ItemRegistry::load(dir.join("registry.json"), dir.join("fallback.json")))
    }

    fn client(source: Arc<MockSource>, store: Arc<CacheStore>, registry: Arc<ItemRegistry>) -> WikiClient {
        WikiClient::new(
            "https://wiki.example/wiki",
            source,
            store,
            registry,
            RankingWeights::default(),
            0.0,
        )
    }

    #[tokio::test]
    async fn test_fetch_parses_and_caches() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source.clone(), store.clone(), registry_at(dir.path()));

        let Lookup::Page(page) = wiki.fetch_page("Whitestone", false).await.unwrap() else {
            panic!("expected a page");
        };
        assert_eq!(page.title, "Whitestone");
        assert_eq!(page.sections.len(), 2);
        assert_eq!(store.stats().await.unwrap().entries, 1);
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source.clone(), store, registry_at(dir.path()));

        let Lookup::Page(first) = wiki.fetch_page("Whitestone", false).await.unwrap() else {
            panic!("expected a page");
        };
        let Lookup::Page(second) = wiki.fetch_page("Whitestone", false).await.unwrap() else {
            panic!("expected a page");
        };

        assert_eq!(first.sections, second.sections);
        assert_eq!(first.fetched_at, second.fetched_at);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_refetches() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source.clone(), store, registry_at(dir.path()));

        wiki.fetch_page("Whitestone", false).await.unwrap();
        wiki.fetch_page("Whitestone", true).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_writes_nothing() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::failing());
        let wiki = client(source, store.clone(), registry_at(dir.path()));

        let result = wiki.fetch_page("Whitestone", false).await;
        assert!(matches!(result, Err(Error::HttpError(_))));
        assert_eq!(store.stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_missing_page_is_not_found() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::missing());
        let wiki = client(source, store.clone(), registry_at(dir.path()));

        let result = wiki.fetch_page("Nowhere", false).await.unwrap();
        assert!(matches!(result, Lookup::NotFound));
        assert_eq!(store.stats().await.unwrap().entries, 0);
    }

    #[tokio::test]
    async fn test_custom_topic_never_fetched() {
        let (dir, store) = test_store().await;
        std::fs::write(
            dir.path().join("registry.json"),
            r#"{"Example Mystic Amulet": {"name": "Example Mystic Amulet", "is_magic": true}}"#,
        )
        .unwrap();
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source.clone(), store, registry_at(dir.path()));

        let result = wiki.fetch_page("Example Mystic Amulet", false).await.unwrap();
        let Lookup::Custom(item) = result else {
            panic!("expected custom item");
        };
        assert!(item.is_magic);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_sections_ranks() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source, store, registry_at(dir.path()));

        let results = wiki.search_sections("Whitestone", "history", 3).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].section.title, "History");
    }

    #[tokio::test]
    async fn test_empty_topic_is_invalid() {
        let (dir, store) = test_store().await;
        let source = Arc::new(MockSource::returning(PAGE_HTML));
        let wiki = client(source, store, registry_at(dir.path()));

        let result = wiki.fetch_page("   ", false).await;
        assert!(matches!(result, Err(Error::InvalidTopic(_))));
    }
}
