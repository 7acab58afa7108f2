//! Page retrieval over HTTP, behind a trait for testability.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::FetchConfig;
use lorekeep_core::Error;

/// Source of raw page HTML.
///
/// `Ok(None)` means the page does not exist; errors are transport-level
/// failures the caller may log and degrade on.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Option<String>, Error>;
}

/// reqwest-backed page source with timeout, redirect, and size limits.
pub struct HttpSource {
    http: Client,
    config: FetchConfig,
}

impl HttpSource {
    /// Build an HTTP source from the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get(&self, url: &Url) -> Result<Option<String>, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(e.to_string())
                } else {
                    Error::HttpError(format!("network error: {}", e))
                }
            })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%url, "page does not exist");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(Error::HttpError(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_bytes
            )));
        }

        tracing::debug!(
            "fetched {} in {}ms ({} bytes)",
            url,
            start.elapsed().as_millis(),
            bytes.len()
        );

        Ok(Some(String::from_utf8_lossy(&bytes).to_string()))
    }
}
