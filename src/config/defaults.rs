//! Default values for configuration

/// Default bind address for the HTTP API
pub fn default_server_bind() -> String {
    "0.0.0.0".to_string()
}

/// Default HTTP API port
pub fn default_server_port() -> u16 {
    3001
}

/// Default user agent
pub fn default_fetch_user_agent() -> String {
    format!(
        "sitemap-architect/{} (+https://github.com/sealad886/sitemap-architect)",
        env!("CARGO_PKG_VERSION")
    )
}

/// Sitemap fetch timeout (primary and child sitemaps)
pub fn default_sitemap_timeout() -> u64 {
    10
}

/// robots.txt fetch timeout
pub fn default_robots_timeout() -> u64 {
    5
}

/// Well-known path probe timeout for single-sitemap discovery
pub fn default_probe_timeout_ms() -> u64 {
    3000
}

/// Well-known path probe timeout for discover-all
pub fn default_discover_probe_timeout_ms() -> u64 {
    4000
}

/// Bytes read from a probed candidate when sniffing for a sitemap marker
pub fn default_probe_max_bytes() -> usize {
    10_000
}

/// Maximum child sitemaps fetched from one sitemap index
pub fn default_max_child_sitemaps() -> usize {
    15
}
