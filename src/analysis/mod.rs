//! Derived views over a flat URL list
//!
//! Both views are recomputed from scratch for every list:
//! - the site tree keyed by path segment
//! - the ranked theme keywords

mod themes;
mod tree;

pub use themes::*;
pub use tree::*;

use serde::{Deserialize, Serialize};

/// Everything derived from one resolved sitemap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteReport {
    pub sitemap_url: String,
    pub url_count: usize,
    pub max_depth: usize,
    pub themes: Vec<ThemeEntry>,
    pub tree: SiteTreeNode,
    pub urls: Vec<String>,
}

impl SiteReport {
    pub fn build(sitemap_url: String, urls: Vec<String>) -> Self {
        let tree = build_tree(&urls);
        let themes = extract_themes(&urls);

        Self {
            sitemap_url,
            url_count: urls.len(),
            max_depth: tree.max_depth(),
            themes,
            tree,
            urls,
        }
    }
}
