//! robots.txt `Sitemap:` directive extraction

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn sitemap_directive() -> Option<&'static Regex> {
    static SITEMAP_DIRECTIVE: OnceLock<Option<Regex>> = OnceLock::new();
    SITEMAP_DIRECTIVE
        .get_or_init(|| Regex::new(r"(?i)Sitemap:\s*(https?://\S+)").ok())
        .as_ref()
}

/// Sitemap URLs declared in robots.txt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsSitemaps {
    urls: Vec<String>,
}

impl RobotsSitemaps {
    /// Scan robots.txt content for absolute `Sitemap:` URLs, in file order
    pub fn parse(content: &str) -> Self {
        let urls: Vec<String> = match sitemap_directive() {
            Some(re) => re
                .captures_iter(content)
                .map(|c| c[1].to_string())
                .collect(),
            None => Vec::new(),
        };

        if !urls.is_empty() {
            debug!("robots.txt declares {} sitemap(s)", urls.len());
        }

        Self { urls }
    }

    pub fn first(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sitemap_directives() {
        let content = r#"
User-agent: *
Disallow: /admin/

Sitemap: https://example.com/sitemap_index.xml
sitemap:https://example.com/news-sitemap.xml
SITEMAP:   http://example.com/legacy.xml
"#;
        let sitemaps = RobotsSitemaps::parse(content);

        assert_eq!(sitemaps.first(), Some("https://example.com/sitemap_index.xml"));
        assert_eq!(
            sitemaps.into_urls(),
            vec![
                "https://example.com/sitemap_index.xml",
                "https://example.com/news-sitemap.xml",
                "http://example.com/legacy.xml",
            ]
        );
    }

    #[test]
    fn test_relative_sitemap_is_ignored() {
        let sitemaps = RobotsSitemaps::parse("Sitemap: /sitemap.xml\n");
        assert_eq!(sitemaps.first(), None);
        assert!(sitemaps.into_urls().is_empty());
    }

    #[test]
    fn test_url_stops_at_whitespace() {
        let sitemaps = RobotsSitemaps::parse("Sitemap: https://example.com/a.xml # main\r\n");
        assert_eq!(sitemaps.into_urls(), vec!["https://example.com/a.xml"]);
    }
}
