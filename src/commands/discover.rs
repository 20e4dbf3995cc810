//! Discover command implementation

use crate::config::Config;
use crate::crawl::SitemapClient;
use crate::error::{Error, Result};
use tracing::info;

/// Find every sitemap a site exposes
pub async fn cmd_discover(config: &Config, base_url: &str) -> Result<Vec<String>> {
    let base_url = base_url.trim();
    if base_url.is_empty() {
        return Err(Error::Input("Base URL is required".to_string()));
    }

    let client = SitemapClient::new(config.fetch.clone())?;
    let sitemaps = client.discover_all(base_url).await;
    info!("Found {} sitemaps for {}", sitemaps.len(), base_url);
    Ok(sitemaps)
}

/// Print sitemap list to console
pub fn print_sitemaps(base_url: &str, sitemaps: &[String]) {
    println!("\n🔎 Sitemaps for {}\n", base_url);

    if sitemaps.is_empty() {
        println!("No sitemaps found.");
        return;
    }

    for sitemap in sitemaps {
        println!("• {}", sitemap);
    }
}
