//! Sitemap XML parsing
//!
//! Supports:
//! - Standard sitemap.xml format (urlset)
//! - Sitemap index files (sitemapindex)
//! - Repairing stray `&` characters before parsing

use super::SitemapClient;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::{debug, warn};

/// The five predefined XML entities; any other `&` gets escaped
const KNOWN_ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

/// One `<url>` or `<sitemap>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntry {
    /// First `<loc>` of the entry, if any
    pub location: Option<String>,
}

/// A parsed sitemap, classified by its root element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: entries point at child sitemaps
    Index(Vec<SitemapEntry>),
    /// `<urlset>`: entries are page URLs
    UrlSet(Vec<SitemapEntry>),
    Unrecognized,
}

impl SitemapDocument {
    pub fn kind(&self) -> &'static str {
        match self {
            SitemapDocument::Index(_) => "index",
            SitemapDocument::UrlSet(_) => "urlset",
            SitemapDocument::Unrecognized => "unrecognized",
        }
    }

    pub fn entries(&self) -> &[SitemapEntry] {
        match self {
            SitemapDocument::Index(entries) | SitemapDocument::UrlSet(entries) => entries,
            SitemapDocument::Unrecognized => &[],
        }
    }

    /// Non-empty locations, in document order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries()
            .iter()
            .filter_map(|e| e.location.as_deref())
            .filter(|loc| !loc.is_empty())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Root {
    Index,
    UrlSet,
    Other,
}

impl Root {
    fn from_name(name: &[u8]) -> Self {
        match name {
            b"sitemapindex" => Root::Index,
            b"urlset" => Root::UrlSet,
            _ => Root::Other,
        }
    }

    fn entry_tag(self) -> Option<&'static [u8]> {
        match self {
            Root::Index => Some(b"sitemap"),
            Root::UrlSet => Some(b"url"),
            Root::Other => None,
        }
    }
}

/// Escape every `&` that does not start one of the predefined XML entities.
///
/// Real-world sitemaps often carry raw `&` in query strings, which no
/// conforming parser accepts.
pub fn sanitize_xml(xml: &str) -> Cow<'_, str> {
    if !xml.contains('&') {
        return Cow::Borrowed(xml);
    }

    let mut out = String::with_capacity(xml.len() + 16);
    let mut rest = xml;
    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        if KNOWN_ENTITIES.iter().any(|entity| tail.starts_with(entity)) {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = &tail[1..];
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Parse sitemap XML into a classified document.
///
/// Element names match by local name, so namespace prefixes are ignored.
/// Only the first `<loc>` directly under an entry counts.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<Root> = None;
    let mut depth = 0usize;
    let mut entries = Vec::new();
    let mut current: Option<SitemapEntry> = None;
    let mut loc_text: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                match depth {
                    0 if root.is_none() => root = Some(Root::from_name(name.as_ref())),
                    1 if root.and_then(Root::entry_tag) == Some(name.as_ref()) => {
                        current = Some(SitemapEntry::default());
                    }
                    2 if current.is_some() && name.as_ref() == b"loc" => {
                        loc_text = Some(String::new());
                    }
                    _ => {}
                }
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                let name = e.local_name();
                match depth {
                    0 if root.is_none() => root = Some(Root::from_name(name.as_ref())),
                    1 if root.and_then(Root::entry_tag) == Some(name.as_ref()) => {
                        entries.push(SitemapEntry::default());
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if let Some(buf) = loc_text.as_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| Error::Parse(format!("invalid text in <loc>: {}", e)))?;
                    buf.push_str(&text);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(buf) = loc_text.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => {
                        if let (Some(text), Some(entry)) = (loc_text.take(), current.as_mut()) {
                            let text = text.trim();
                            if entry.location.is_none() && !text.is_empty() {
                                entry.location = Some(text.to_string());
                            }
                        }
                    }
                    1 => {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Parse(format!(
                    "malformed XML at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::Parse(
            "unexpected end of document: unclosed element".to_string(),
        ));
    }

    Ok(match root {
        Some(Root::Index) => SitemapDocument::Index(entries),
        Some(Root::UrlSet) => SitemapDocument::UrlSet(entries),
        _ => SitemapDocument::Unrecognized,
    })
}

impl SitemapClient {
    /// Fetch, sanitize and parse one sitemap
    pub async fn fetch_sitemap(&self, url: &str) -> Result<SitemapDocument> {
        let result = self.fetch_and_parse(url).await;
        match &result {
            Ok(doc) => debug!(
                "Parsed {} sitemap with {} entries: {}",
                doc.kind(),
                doc.entries().len(),
                url
            ),
            Err(e) => warn!("Failed to fetch sitemap {}: {}", url, e),
        }
        result
    }

    async fn fetch_and_parse(&self, url: &str) -> Result<SitemapDocument> {
        let content = self
            .fetch_text(url, self.config().sitemap_timeout())
            .await?;

        if content.trim().is_empty() {
            return Err(Error::fetch(url, "Sitemap response is empty or not text"));
        }

        parse_sitemap(&sanitize_xml(&content))
    }
}
