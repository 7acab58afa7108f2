//! Unified error types for mcp-lore.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the mcp-lore server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty topic).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Cache storage I/O failed.
    #[error("CACHE_ERROR: {0}")]
    Storage(#[from] std::io::Error),

    /// A persisted document could not be encoded or decoded.
    #[error("DATA_ERROR: {0}")]
    Json(#[from] serde_json::Error),

    /// Topic could not be turned into a page URL.
    #[error("INVALID_TOPIC: {0}")]
    InvalidTopic(String),

    /// HTTP error response or network failure.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response too large.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Storage(e) => (-32001, e.to_string()),
            Error::Json(e) => (-32002, e.to_string()),
            Error::InvalidTopic(msg) => (-32003, msg.clone()),
            Error::HttpError(msg) => (-32004, msg.clone()),
            Error::FetchTimeout(msg) => (-32005, msg.clone()),
            Error::FetchTooLarge(msg) => (-32006, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
