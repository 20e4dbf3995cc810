//! Analyze command implementation

use crate::analysis::{SiteReport, SiteTreeNode};
use crate::config::Config;
use crate::crawl::SitemapClient;
use crate::error::Result;
use std::fmt::Write;
use tracing::info;

/// Resolve a sitemap and derive the tree and themes from its URLs
pub async fn cmd_analyze(config: &Config, input: &str) -> Result<SiteReport> {
    let client = SitemapClient::new(config.fetch.clone())?;
    let resolved = client.analyze_sitemap(input).await?;

    let report = SiteReport::build(resolved.sitemap_url, resolved.urls);
    info!(
        "Built report: {} URLs, depth {}, {} themes",
        report.url_count,
        report.max_depth,
        report.themes.len()
    );
    Ok(report)
}

/// Render the site tree, one node per line, down to `max_depth` levels
pub fn render_tree(root: &SiteTreeNode, max_depth: Option<usize>) -> String {
    let mut out = String::from("/\n");
    render_children(root, 1, max_depth, &mut out);
    out
}

fn render_children(node: &SiteTreeNode, depth: usize, max_depth: Option<usize>, out: &mut String) {
    if max_depth.is_some_and(|max| depth > max) {
        return;
    }

    let indent = "  ".repeat(depth);
    for (name, child) in &node.children {
        if child.is_leaf() {
            let _ = writeln!(out, "{}📄 {}", indent, name);
        } else {
            let _ = writeln!(out, "{}📁 {} ({})", indent, name, child.children.len());
            render_children(child, depth + 1, max_depth, out);
        }
    }
}

/// Print report to console
pub fn print_report(report: &SiteReport, tree_depth: Option<usize>) {
    println!("\n🗺  Sitemap Analysis\n");
    println!("Sitemap: {}", report.sitemap_url);
    println!("  URLs: {}", report.url_count);
    println!("  Tree depth: {}", report.max_depth);
    println!("  Themes: {}", report.themes.len());

    println!("\nSite Structure:");
    print!("{}", render_tree(&report.tree, tree_depth));

    println!("\nThemes:");
    if report.themes.is_empty() {
        println!("  (none)");
    }
    for (rank, theme) in report.themes.iter().enumerate() {
        println!("  {:>2}. {} ({})", rank + 1, theme.name, theme.score);
    }
}
