//! Site structure tree built from URL paths

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use url::Url;

/// One node of the site tree; the root has no name of its own.
///
/// A child exists only if at least one URL passed through that segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteTreeNode {
    pub children: BTreeMap<String, SiteTreeNode>,
}

impl SiteTreeNode {
    /// Walk `segments` from this node, creating missing children
    pub fn insert_path<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut current = self;
        for segment in segments {
            current = current.children.entry(segment.into()).or_default();
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Greatest number of edges from this node down to a leaf
    pub fn max_depth(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.max_depth())
            .max()
            .unwrap_or(0)
    }
}

/// Non-empty path segments of a URL, root first
pub fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

/// Fold a URL list into a single rooted tree keyed by path segment.
///
/// URLs that do not parse are skipped.
pub fn build_tree<S: AsRef<str>>(urls: &[S]) -> SiteTreeNode {
    urls.iter().fold(SiteTreeNode::default(), |mut root, raw| {
        match Url::parse(raw.as_ref()) {
            Ok(url) => root.insert_path(path_segments(&url)),
            Err(e) => warn!("Invalid URL {}: {}", raw.as_ref(), e),
        }
        root
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_tree_shares_prefixes() {
        let tree = build_tree(&[
            "https://example.com/shop/shoes/red",
            "https://example.com/shop/hats",
            "https://example.com/about",
        ]);

        assert_eq!(tree.children.len(), 2);
        let shop = &tree.children["shop"];
        assert_eq!(shop.children.len(), 2);
        assert!(shop.children["hats"].is_leaf());
        assert!(shop.children["shoes"].children.contains_key("red"));
        assert_eq!(tree.max_depth(), 3);
    }

    #[test]
    fn test_depth_is_longest_segment_count() {
        let tree = build_tree(&[
            "https://example.com/a/b/c/d",
            "https://example.com//a//b/",
            "https://example.com/x",
        ]);
        assert_eq!(tree.max_depth(), 4);
    }

    #[test]
    fn test_invalid_urls_are_skipped() {
        let tree = build_tree(&["not a url", "https://example.com/docs/intro", "/relative/path"]);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.children.keys().collect::<Vec<_>>(), vec!["docs"]);
    }

    #[test]
    fn test_empty_tree() {
        let urls: [&str; 0] = [];
        let tree = build_tree(&urls);
        assert_eq!(tree.max_depth(), 0);

        let root_only = build_tree(&["https://example.com/", "https://example.com"]);
        assert!(root_only.is_leaf());
        assert_eq!(root_only.max_depth(), 0);
    }

    #[test]
    fn test_query_and_fragment_do_not_create_nodes() {
        let tree = build_tree(&["https://example.com/search?q=a/b#top/x"]);
        assert_eq!(tree.max_depth(), 1);
        assert!(tree.children["search"].is_leaf());
    }
}
