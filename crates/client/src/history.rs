//! History checks with lore-backed recall.
//!
//! Estimates a DC from the topic's wording, grades the level of detail by
//! the check result, and pulls recall text from the lore wiki when
//! available, falling back to canned prompts for the game master.

use serde::Serialize;

use crate::lore::LoreService;

/// How much the character recalls, by check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    Vague,
    Basic,
    Detailed,
    Comprehensive,
}

impl DetailLevel {
    pub fn for_check(check_result: i32) -> Self {
        if check_result < 10 {
            DetailLevel::Vague
        } else if check_result < 15 {
            DetailLevel::Basic
        } else if check_result < 20 {
            DetailLevel::Detailed
        } else {
            DetailLevel::Comprehensive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DetailLevel::Vague => "vague",
            DetailLevel::Basic => "basic",
            DetailLevel::Detailed => "detailed",
            DetailLevel::Comprehensive => "comprehensive",
        }
    }
}

const COMMON_KEYWORDS: &[&str] = &["tavern", "inn", "common", "well-known", "famous", "recent"];
const OBSCURE_KEYWORDS: &[&str] = &["ancient", "lost", "forgotten", "secret", "hidden", "mysterious"];
const VERY_OBSCURE_KEYWORDS: &[&str] = &["primordial", "primeval", "legendary", "mythical", "forbidden"];

/// Estimate the DC for recalling a topic from its wording.
///
/// Common knowledge is DC 10, uncommon 15, obscure 20, ancient or secret
/// knowledge 25.
pub fn estimate_dc(topic: &str) -> i32 {
    let topic = topic.to_lowercase();

    if COMMON_KEYWORDS.iter().any(|word| topic.contains(word)) {
        return 10;
    }
    if OBSCURE_KEYWORDS.iter().any(|word| topic.contains(word)) {
        return 20;
    }
    if VERY_OBSCURE_KEYWORDS.iter().any(|word| topic.contains(word)) {
        return 25;
    }
    15
}

/// Outcome of a History check.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryCheckOutcome {
    pub success: bool,
    pub check_result: i32,
    pub dc: i32,
    pub information: String,
    /// "wiki" when lore-backed, "fallback" otherwise, "failure" on a miss.
    pub source: String,
    pub detail_level: Option<String>,
}

/// Resolve a character's History check.
///
/// A failed check recalls nothing. A successful one prefers wiki-backed
/// recall and degrades to a canned DM prompt when no lore is available.
pub async fn handle_history_check(
    lore: &LoreService, topic: &str, check_result: i32, character_name: Option<&str>,
) -> HistoryCheckOutcome {
    let dc = estimate_dc(topic);

    if check_result < dc {
        return HistoryCheckOutcome {
            success: false,
            check_result,
            dc,
            information: format!("You struggle to recall specific details about {topic}."),
            source: "failure".to_string(),
            detail_level: None,
        };
    }

    let level = DetailLevel::for_check(check_result);

    if let Some(info) = lore.history_check_info(topic, check_result).await {
        let prefix = match character_name {
            Some(name) => format!("{name} recalls: "),
            None => "You recall: ".to_string(),
        };
        return HistoryCheckOutcome {
            success: true,
            check_result,
            dc,
            information: format!("{prefix}{info}"),
            source: "wiki".to_string(),
            detail_level: Some(level.as_str().to_string()),
        };
    }

    HistoryCheckOutcome {
        success: true,
        check_result,
        dc,
        information: fallback_information(topic, level),
        source: "fallback".to_string(),
        detail_level: Some(level.as_str().to_string()),
    }
}

fn fallback_information(topic: &str, level: DetailLevel) -> String {
    match level {
        DetailLevel::Vague => {
            format!("You have heard of {topic} before, but can't recall specific details.")
        }
        DetailLevel::Basic => format!("You know some basic facts about {topic}. [DM provides 1-2 key facts]"),
        DetailLevel::Detailed => {
            format!("You recall quite a bit about {topic}. [DM provides 3-4 significant details]")
        }
        DetailLevel::Comprehensive => format!(
            "Your knowledge of {topic} is extensive. [DM provides comprehensive information \
             including history, significance, and connections]"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lorekeep_core::{CacheStore, ItemRegistry};
    use std::sync::Arc;

    async fn disabled_service() -> (tempfile::TempDir, LoreService) {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(ItemRegistry::load(
            dir.path().join("registry.json"),
            dir.path().join("fallback.json"),
        ));
        let store = Arc::new(CacheStore::open(dir.path().join("cache"), 3600, 16).await.unwrap());
        let service = LoreService::new(false, None, None, registry, store);
        (dir, service)
    }

    #[test]
    fn test_estimate_dc_tiers() {
        assert_eq!(estimate_dc("The Laughing Tavern"), 10);
        assert_eq!(estimate_dc("Trade routes of Emon"), 15);
        assert_eq!(estimate_dc("Ancient Primordial Ruins"), 20); // obscure beats very obscure
        assert_eq!(estimate_dc("Forbidden rites"), 25);
    }

    #[test]
    fn test_detail_levels() {
        assert_eq!(DetailLevel::for_check(8), DetailLevel::Vague);
        assert_eq!(DetailLevel::for_check(12), DetailLevel::Basic);
        assert_eq!(DetailLevel::for_check(17), DetailLevel::Detailed);
        assert_eq!(DetailLevel::for_check(25), DetailLevel::Comprehensive);
    }

    #[tokio::test]
    async fn test_failed_check() {
        let (_dir, service) = disabled_service().await;
        let outcome = handle_history_check(&service, "Trade routes of Emon", 11, None).await;

        assert!(!outcome.success);
        assert_eq!(outcome.dc, 15);
        assert_eq!(outcome.source, "failure");
        assert!(outcome.information.contains("struggle to recall"));
    }

    #[tokio::test]
    async fn test_fallback_when_no_lore() {
        let (_dir, service) = disabled_service().await;
        let outcome = handle_history_check(&service, "Trade routes of Emon", 18, Some("Lysara")).await;

        assert!(outcome.success);
        assert_eq!(outcome.source, "fallback");
        assert_eq!(outcome.detail_level.as_deref(), Some("detailed"));
        assert!(outcome.information.contains("quite a bit"));
    }
}
