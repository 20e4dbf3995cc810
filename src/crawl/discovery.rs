//! Sitemap discovery via robots.txt and well-known paths

use super::{RobotsSitemaps, SitemapClient};
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, info};

/// Paths probed, in order, when looking for a single sitemap
pub const WELL_KNOWN_PATHS: [&str; 3] = ["/sitemap.xml", "/sitemap_index.xml", "/wp-sitemap.xml"];

/// Paths probed concurrently when looking for every sitemap
pub const EXTENDED_WELL_KNOWN_PATHS: [&str; 5] = [
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/wp-sitemap.xml",
    "/sitemap_pages.xml",
    "/sitemap_posts.xml",
];

/// Marker a probed body must contain to count as a sitemap during discover-all.
/// Matches both `<sitemapindex` and `<sitemap>`.
const SITEMAP_MARKER: &str = "<sitemap";

/// Normalize user input into a scheme-qualified origin without a trailing slash
pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

impl SitemapClient {
    /// Declared sitemaps from `{base}/robots.txt`; empty when it cannot be fetched
    async fn robots_sitemaps(&self, base: &str) -> RobotsSitemaps {
        let robots_url = format!("{}/robots.txt", base);
        match self
            .fetch_text(&robots_url, self.config().robots_timeout())
            .await
        {
            Ok(content) => RobotsSitemaps::parse(&content),
            Err(e) => {
                debug!("No usable robots.txt: {}", e);
                RobotsSitemaps::default()
            }
        }
    }

    /// Find the most likely sitemap for a site.
    ///
    /// The first robots.txt `Sitemap:` directive wins; otherwise the well-known
    /// paths are probed one at a time and the first success status wins.
    pub async fn discover(&self, base_url: &str) -> Option<String> {
        let base = normalize_base_url(base_url);

        if let Some(url) = self.robots_sitemaps(&base).await.first() {
            info!("Sitemap declared in robots.txt: {}", url);
            return Some(url.to_string());
        }

        for path in WELL_KNOWN_PATHS {
            let candidate = format!("{}{}", base, path);
            if self.probe(&candidate, self.config().probe_timeout()).await {
                info!("Sitemap found at well-known path: {}", candidate);
                return Some(candidate);
            }
        }

        debug!("No sitemap discovered for {}", base);
        None
    }

    /// Find every confirmed sitemap for a site.
    ///
    /// Collects all robots.txt directives, then probes the extended path list
    /// concurrently, keeping candidates whose body carries a sitemap marker.
    /// Robots entries come first, then probes in path order, without duplicates.
    pub async fn discover_all(&self, base_url: &str) -> Vec<String> {
        let base = normalize_base_url(base_url);
        let declared = self.robots_sitemaps(&base).await;

        let timeout = self.config().discover_probe_timeout();
        let max_bytes = self.config().probe_max_bytes;
        let probes = EXTENDED_WELL_KNOWN_PATHS.iter().map(|path| {
            let candidate = format!("{}{}", base, path);
            async move {
                match self.fetch_prefix(&candidate, timeout, max_bytes).await {
                    Ok(body) if body.contains(SITEMAP_MARKER) => Some(candidate),
                    Ok(_) => {
                        debug!("No sitemap marker in {}", candidate);
                        None
                    }
                    Err(e) => {
                        debug!("Probe miss: {}", e);
                        None
                    }
                }
            }
        });
        let confirmed = join_all(probes).await;

        let mut seen = HashSet::new();
        let sitemaps: Vec<String> = declared
            .into_urls()
            .into_iter()
            .chain(confirmed.into_iter().flatten())
            .filter(|url| seen.insert(url.clone()))
            .collect();

        info!("Discovered {} sitemap(s) for {}", sitemaps.len(), base);
        sitemaps
    }
}
