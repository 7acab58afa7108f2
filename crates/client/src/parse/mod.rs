//! Wiki page parsing into a title and named sections.
//!
//! Works against MediaWiki-flavored markup: the title comes from
//! `h1.page-header__title` or `h1#firstHeading`, the body from
//! `div.mw-parser-output` or `#mw-content-text`. Body content is walked in
//! document order; `h2`/`h3` open a new section, `p` and `ul` accumulate
//! into the current one, starting with an implicit "Introduction".

pub mod clean;

use scraper::{ElementRef, Html, Selector};

use clean::{clean_heading, clean_wiki_text};
use lorekeep_core::Section;

/// Parsed page content before caching.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub title: String,
    pub sections: Vec<Section>,
}

/// Parse a wiki page, falling back to `fallback_title` when the page
/// carries no heading.
///
/// Returns `None` when no recognizable content container is present.
pub fn parse_page(html: &str, fallback_title: &str) -> Option<ParsedPage> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "h1.page-header__title")
        .or_else(|| first_text(&document, "h1#firstHeading"))
        .unwrap_or_else(|| fallback_title.trim().to_string());

    let content = select_first(&document, "div.mw-parser-output")
        .or_else(|| select_first(&document, "#mw-content-text"))?;

    Some(ParsedPage { title, sections: parse_sections(content) })
}

fn parse_sections(content: ElementRef) -> Vec<Section> {
    let blocks = Selector::parse("h2, h3, p, ul").expect("invalid selector");
    let list_items = Selector::parse("li").expect("invalid selector");

    let mut sections = Vec::new();
    let mut current = Section { title: "Introduction".to_string(), content: String::new() };

    for element in content.select(&blocks) {
        match element.value().name() {
            "h2" | "h3" => {
                if !current.content.is_empty() {
                    current.content = clean_wiki_text(&current.content);
                    sections.push(current);
                }
                current = Section { title: clean_heading(&element_text(element)), content: String::new() };
            }
            "p" => {
                let text = element_text(element);
                if !text.is_empty() {
                    current.content.push_str(&text);
                    current.content.push_str("\n\n");
                }
            }
            "ul" => {
                let items: Vec<String> = element
                    .select(&list_items)
                    .map(element_text)
                    .filter(|item| !item.is_empty())
                    .collect();
                if !items.is_empty() {
                    for item in &items {
                        current.content.push_str(&format!("• {item}\n"));
                    }
                    current.content.push('\n');
                }
            }
            _ => {}
        }
    }

    if !current.content.is_empty() {
        current.content = clean_wiki_text(&current.content);
        sections.push(current);
    }

    sections
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("invalid selector");
    document.select(&selector).next()
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    select_first(document, selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIKI_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head><title>Whitestone | Wiki</title></head>
        <body>
            <h1 class="page-header__title">Whitestone</h1>
            <div class="mw-parser-output">
                <p>Whitestone is a city in the north.[1]</p>
                <h2>History[edit]</h2>
                <p>The city was founded centuries ago.[2]</p>
                <p>It endured a long occupation.</p>
                <h3>Notable residents</h3>
                <ul>
                    <li>Lady of the castle</li>
                    <li>Keeper of the temple</li>
                </ul>
            </div>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_title_and_sections() {
        let page = parse_page(WIKI_HTML, "whitestone").unwrap();

        assert_eq!(page.title, "Whitestone");
        assert_eq!(page.sections.len(), 3);
        assert_eq!(page.sections[0].title, "Introduction");
        assert_eq!(page.sections[1].title, "History");
        assert_eq!(page.sections[2].title, "Notable residents");
    }

    #[test]
    fn test_parse_strips_citations() {
        let page = parse_page(WIKI_HTML, "whitestone").unwrap();
        assert_eq!(page.sections[0].content, "Whitestone is a city in the north.");
        assert!(!page.sections[1].content.contains("[2]"));
    }

    #[test]
    fn test_parse_joins_paragraphs() {
        let page = parse_page(WIKI_HTML, "whitestone").unwrap();
        assert!(page.sections[1].content.contains("founded centuries ago."));
        assert!(page.sections[1].content.contains("long occupation."));
    }

    #[test]
    fn test_parse_renders_bullets() {
        let page = parse_page(WIKI_HTML, "whitestone").unwrap();
        assert!(page.sections[2].content.contains("• Lady of the castle"));
        assert!(page.sections[2].content.contains("• Keeper of the temple"));
    }

    #[test]
    fn test_parse_first_heading_fallback() {
        let html = r#"
            <html><body>
                <h1 id="firstHeading">Emon</h1>
                <div id="mw-content-text"><p>Capital of Tal'Dorei.</p></div>
            </body></html>
        "#;
        let page = parse_page(html, "emon").unwrap();
        assert_eq!(page.title, "Emon");
        assert_eq!(page.sections.len(), 1);
    }

    #[test]
    fn test_parse_title_falls_back_to_topic() {
        let html = r#"<html><body><div class="mw-parser-output"><p>Text.</p></div></body></html>"#;
        let page = parse_page(html, "Some Topic").unwrap();
        assert_eq!(page.title, "Some Topic");
    }

    #[test]
    fn test_parse_no_content_container() {
        let html = r#"<html><body><p>Nothing wiki-shaped here.</p></body></html>"#;
        assert!(parse_page(html, "anything").is_none());
    }

    #[test]
    fn test_parse_empty_sections_dropped() {
        let html = r#"
            <html><body>
                <div class="mw-parser-output">
                    <h2>Empty heading</h2>
                    <h2>Another</h2>
                    <p>Only this survives.</p>
                </div>
            </body></html>
        "#;
        let page = parse_page(html, "topic").unwrap();
        assert_eq!(page.sections.len(), 1);
        assert_eq!(page.sections[0].title, "Another");
    }
}
