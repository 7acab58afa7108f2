//! Topic to page-URL conversion.

use url::Url;

/// Error type for topic URL building failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TopicError {
    #[error("empty topic")]
    Empty,

    #[error("invalid base URL: {0}")]
    InvalidBase(String),
}

/// Build the page URL for a topic against a wiki base URL.
///
/// Whitespace runs in the topic become single underscores and the segment
/// is percent-encoded, so "Ancient  Primordial Ruins" on base
/// `https://wiki.example/wiki` yields
/// `https://wiki.example/wiki/Ancient_Primordial_Ruins`.
pub fn page_url(base_url: &str, topic: &str) -> Result<Url, TopicError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }

    let segment = topic.split_whitespace().collect::<Vec<_>>().join("_");

    let mut url =
        Url::parse(base_url.trim_end_matches('/')).map_err(|e| TopicError::InvalidBase(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| TopicError::InvalidBase("cannot be a base".into()))?
        .push(&segment);

    Ok(url)
}
