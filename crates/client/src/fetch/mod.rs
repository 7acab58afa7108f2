//! HTTP fetch pipeline for wiki pages.
//!
//! ### Topic URLs
//! - Spaces become underscores, the segment is percent-encoded, and the
//!   result is appended to the configured wiki base URL.
//!
//! ### Safety limits
//! - Request timeout and redirect cap via the client configuration.
//! - Max body bytes enforced before and after the body read.
//!
//! ### Page source seam
//! - Network access goes through the [`PageSource`] trait so callers can
//!   substitute a canned source in tests.

pub mod source;
pub mod topic;

use std::time::Duration;

pub use source::{HttpSource, PageSource};
pub use topic::{TopicError, page_url};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "mcp-lore/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "mcp-lore/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}
