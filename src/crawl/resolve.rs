//! Sitemap index resolution and the analyze pipeline

use super::{normalize_base_url, SitemapClient, SitemapDocument, SitemapEntry};
use crate::error::{Error, Result};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{info, warn};

/// Message returned when a sitemap resolves to nothing
pub const NO_URLS_MESSAGE: &str =
    "No URLs successfully extracted. The site might be blocking us or the format is unusual.";

/// URLs extracted from a sitemap, with the sitemap they came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSitemap {
    pub sitemap_url: String,
    pub urls: Vec<String>,
}

/// Drop repeated URLs, keeping the first occurrence of each
pub fn dedupe_urls(urls: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

impl SitemapClient {
    /// Expand a sitemap index into the URLs of its child urlsets.
    ///
    /// Only the first `max_child_sitemaps` children are fetched, concurrently.
    /// A child that fails or is not a urlset contributes nothing.
    pub async fn resolve_index(&self, entries: &[SitemapEntry]) -> Vec<String> {
        let children: Vec<&str> = entries
            .iter()
            .filter_map(|e| e.location.as_deref())
            .filter(|loc| !loc.is_empty())
            .collect();

        let cap = self.config().max_child_sitemaps;
        if children.len() > cap {
            warn!(
                "Sitemap index lists {} sitemaps, fetching only the first {}",
                children.len(),
                cap
            );
        }

        let fetches = children
            .iter()
            .take(cap)
            .map(|child| async move { (*child, self.fetch_sitemap(child).await.ok()) });
        let results = join_all(fetches).await;

        let mut urls = Vec::new();
        for (child, doc) in results {
            match doc {
                Some(doc @ SitemapDocument::UrlSet(_)) => {
                    urls.extend(doc.locations().map(str::to_string));
                }
                Some(other) => {
                    warn!("Skipping child sitemap {} ({})", child, other.kind());
                }
                // fetch_sitemap already logged the failure
                None => {}
            }
        }

        dedupe_urls(urls)
    }

    /// Flatten any sitemap document into a deduplicated URL list
    pub async fn collect_urls(&self, doc: &SitemapDocument) -> Vec<String> {
        match doc {
            SitemapDocument::Index(entries) => self.resolve_index(entries).await,
            SitemapDocument::UrlSet(_) => dedupe_urls(doc.locations().map(str::to_string)),
            SitemapDocument::Unrecognized => {
                warn!("Document is neither a urlset nor a sitemap index");
                Vec::new()
            }
        }
    }

    /// Pick the sitemap to analyze for user input.
    ///
    /// Input ending in `.xml` is used as-is; anything else goes through
    /// discovery, falling back to `{base}/sitemap.xml`.
    pub async fn resolve_target(&self, input: &str) -> String {
        if input.ends_with(".xml") {
            return input.to_string();
        }

        match self.discover(input).await {
            Some(url) => url,
            None => {
                let guess = format!("{}/sitemap.xml", normalize_base_url(input));
                info!("No sitemap discovered, guessing {}", guess);
                guess
            }
        }
    }

    /// Resolve user input to the full, deduplicated URL list of a site.
    ///
    /// Fails with `Input` on blank input, `Fetch`/`Parse` when the primary
    /// sitemap is unusable, and `NotFound` when nothing was extracted.
    pub async fn analyze_sitemap(&self, input: &str) -> Result<ResolvedSitemap> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::Input("Sitemap URL is required".to_string()));
        }

        let sitemap_url = self.resolve_target(input).await;
        info!("Analyzing sitemap: {}", sitemap_url);

        let doc = self.fetch_sitemap(&sitemap_url).await?;
        let urls = self.collect_urls(&doc).await;

        if urls.is_empty() {
            return Err(Error::NotFound(NO_URLS_MESSAGE.to_string()));
        }

        info!("Extracted {} unique URLs from {}", urls.len(), sitemap_url);
        Ok(ResolvedSitemap { sitemap_url, urls })
    }
}
