//! Sitemap discovery and fetching
//!
//! This module provides:
//! - A shared HTTP client with per-request timeouts
//! - robots.txt `Sitemap:` directive extraction
//! - Well-known path probing (first match and all matches)
//! - Sitemap XML sanitization, parsing and classification
//! - Sitemap index resolution with a bounded fan-out

mod discovery;
mod resolve;
mod robots;
mod sitemap;

pub use discovery::*;
pub use resolve::*;
pub use robots::*;
pub use sitemap::*;

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// HTTP client shared by every fetch in a request.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SitemapClient {
    client: Client,
    config: FetchConfig,
}

impl SitemapClient {
    /// Create a new client
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/xml,text/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.8"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url`, failing on transport errors, timeouts and non-success statuses
    async fn send(&self, url: &str, timeout: Duration) -> Result<Response> {
        debug!("Fetching: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(Error::fetch(url, reason));
        }

        Ok(response)
    }

    /// Fetch the full body of `url` as text, decoded with the declared charset
    pub async fn fetch_text(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self.send(url, timeout).await?;
        response
            .text()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))
    }

    /// Check that `url` answers with a success status, without reading the body
    pub async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.send(url, timeout).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Probe miss: {}", e);
                false
            }
        }
    }

    /// Fetch at most `max_bytes` of `url`'s body, for content sniffing
    pub async fn fetch_prefix(&self, url: &str, timeout: Duration, max_bytes: usize) -> Result<String> {
        let mut response = self.send(url, timeout).await?;
        let mut body: Vec<u8> = Vec::new();

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::fetch(url, e.to_string()))?
        {
            let take = chunk.len().min(max_bytes - body.len());
            body.extend_from_slice(&chunk[..take]);
            if body.len() >= max_bytes {
                break;
            }
        }

        // The cut may split a multi-byte character
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
