//! Custom/homebrew item registry.
//!
//! Items listed here are user-defined content and must never be looked up
//! against an external wiki. Two documents of the same shape are consulted:
//! the explicit registry (authoritative) and a lower-precedence fallback
//! list. On conflicting names the explicit registry wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::key::normalize_key;

/// A custom/homebrew item record.
///
/// Presence in either document means: do NOT look this name up externally.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CustomItem {
    #[serde(default)]
    pub name: String,

    /// weapon, armor, gear, magic_item, consumable, tool, etc.
    #[serde(default = "default_item_type")]
    pub item_type: String,

    #[serde(default)]
    pub is_magic: bool,

    #[serde(default)]
    pub description: String,

    /// Free-form descriptive fields (rarity, attunement, weight, ...).
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub notes: String,
}

fn default_item_type() -> String {
    "gear".into()
}

/// Which document a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    Registry,
    Fallback,
}

impl ItemSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemSource::Registry => "registry",
            ItemSource::Fallback => "fallback",
        }
    }
}

/// Custom-item filter over the explicit registry and the fallback list.
///
/// Name matching is case-insensitive and whitespace-normalized. Loading is
/// fail-soft: a missing document is empty, a malformed entry is logged and
/// skipped while the rest of the document loads.
#[derive(Debug)]
pub struct ItemRegistry {
    registry_path: PathBuf,
    items: HashMap<String, CustomItem>,
    fallback: HashMap<String, CustomItem>,
}

impl ItemRegistry {
    /// Load both documents. Never fails; problems are logged and the
    /// affected document or entry is skipped.
    pub fn load(registry_path: impl AsRef<Path>, fallback_path: impl AsRef<Path>) -> Self {
        let registry_path = registry_path.as_ref().to_path_buf();
        let items = load_document(&registry_path);
        let fallback = load_document(fallback_path.as_ref());

        if !items.is_empty() || !fallback.is_empty() {
            tracing::info!(
                explicit = items.len(),
                fallback = fallback.len(),
                "custom item filter loaded, listed names will not be looked up externally"
            );
        }

        Self { registry_path, items, fallback }
    }

    /// Whether `name` is user-defined content (in either document).
    pub fn is_custom(&self, name: &str) -> bool {
        let key = normalize_key(name);
        self.items.contains_key(&key) || self.fallback.contains_key(&key)
    }

    /// Local record for `name`, explicit registry first, then fallback.
    pub fn get_item(&self, name: &str) -> Option<(&CustomItem, ItemSource)> {
        let key = normalize_key(name);
        if let Some(item) = self.items.get(&key) {
            return Some((item, ItemSource::Registry));
        }
        self.fallback.get(&key).map(|item| (item, ItemSource::Fallback))
    }

    /// Add an item to the explicit registry and persist it.
    pub fn register_item(&mut self, item: CustomItem) -> Result<(), Error> {
        self.items.insert(normalize_key(&item.name), item);
        self.save()
    }

    /// Remove an item from the explicit registry and persist the change.
    ///
    /// Returns whether a record was actually removed. Fallback records are
    /// not touched.
    pub fn remove_item(&mut self, name: &str) -> Result<bool, Error> {
        let removed = self.items.remove(&normalize_key(name)).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    /// Persist the explicit registry document.
    pub fn save(&self) -> Result<(), Error> {
        let mut doc = serde_json::Map::new();
        for item in self.items.values() {
            doc.insert(item.name.clone(), serde_json::to_value(item)?);
        }

        if let Some(parent) = self.registry_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.registry_path, serde_json::to_vec_pretty(&doc)?)?;
        Ok(())
    }

    /// All custom items, explicit records shadowing fallback ones.
    pub fn custom_items(&self) -> Vec<&CustomItem> {
        let mut all: Vec<&CustomItem> = self.items.values().collect();
        all.extend(
            self.fallback
                .iter()
                .filter(|(key, _)| !self.items.contains_key(*key))
                .map(|(_, item)| item),
        );
        all
    }

    /// Custom items flagged as magic.
    pub fn magic_items(&self) -> Vec<&CustomItem> {
        self.custom_items().into_iter().filter(|item| item.is_magic).collect()
    }

    /// Number of distinct custom names across both documents.
    pub fn len(&self) -> usize {
        self.custom_items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.fallback.is_empty()
    }
}

fn load_document(path: &Path) -> HashMap<String, CustomItem> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable item document, skipping");
            return HashMap::new();
        }
    };

    let doc: serde_json::Map<String, serde_json::Value> = match serde_json::from_slice(&bytes) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed item document, skipping");
            return HashMap::new();
        }
    };

    let mut items = HashMap::new();
    for (name, value) in doc {
        match serde_json::from_value::<CustomItem>(value) {
            Ok(mut item) => {
                if item.name.is_empty() {
                    item.name = name.clone();
                }
                items.insert(normalize_key(&name), item);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), item = %name, error = %e, "skipping malformed item entry");
            }
        }
    }
    items
}
