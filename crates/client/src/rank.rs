//! Section relevance ranking.
//!
//! A pure scoring pass over a page's sections: the whole query appearing
//! in a section title weighs most, shared title words next, shared body
//! words least. Weights and the minimum score are configuration.

use std::collections::HashSet;

use serde::Serialize;

use lorekeep_core::Section;
use lorekeep_core::config::RankingWeights;

/// A section paired with its relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct RankedSection {
    pub section: Section,
    pub score: f32,
}

/// Rank `sections` against `query`, best first.
///
/// Sections scoring below `min_score` (or zero) are dropped; at most
/// `max_results` are returned.
pub fn rank_sections(
    query: &str, sections: &[Section], weights: &RankingWeights, min_score: f32, max_results: usize,
) -> Vec<RankedSection> {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return Vec::new();
    }
    let query_words: HashSet<&str> = query_lower.split_whitespace().collect();

    let mut results = Vec::new();

    for section in sections {
        let title = section.title.to_lowercase();
        let content = section.content.to_lowercase();

        let mut score = 0.0f32;

        if title.contains(&query_lower) {
            score += weights.title_phrase;
        }

        let title_words: HashSet<&str> = title.split_whitespace().collect();
        score += query_words.intersection(&title_words).count() as f32 * weights.title_word;

        let content_words: HashSet<&str> = content.split_whitespace().collect();
        score += query_words.intersection(&content_words).count() as f32 * weights.body_word;

        if score > 0.0 && score >= min_score {
            results.push(RankedSection { section: section.clone(), score });
        }
    }

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(max_results);
    results
}
