//! Wiki text cleanup.

use std::sync::LazyLock;

use regex::Regex;

static CITATIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").expect("invalid regex"));
static EDIT_LINKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[edit\]").expect("invalid regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("invalid regex"));

/// Strip citation markers, edit links, and excess blank lines from body text.
pub fn clean_wiki_text(text: &str) -> String {
    let text = CITATIONS.replace_all(text, "");
    let text = EDIT_LINKS.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Strip edit links from a section heading.
pub fn clean_heading(text: &str) -> String {
    EDIT_LINKS.replace_all(text, "").trim().to_string()
}
