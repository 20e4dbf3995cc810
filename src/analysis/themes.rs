//! Theme keywords ranked from URL path segments

use super::tree::path_segments;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Most themes returned
pub const MAX_THEMES: usize = 30;

/// Segments shorter than this carry no theme
const MIN_SEGMENT_CHARS: usize = 3;

/// Weight of a segment at position 0; each level deeper counts one less, down to 1
const TOP_LEVEL_WEIGHT: u64 = 4;

const STOPWORDS: [&str; 21] = [
    "a", "the", "and", "or", "in", "on", "at", "to", "for", "with", "by", "is", "are", "was",
    "were", "be", "an", "as", "from", "into", "of",
];

/// A ranked keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub name: String,
    pub score: u64,
}

fn segment_weight(position: usize) -> u64 {
    TOP_LEVEL_WEIGHT.saturating_sub(position as u64).max(1)
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

/// Numeric under JavaScript `Number()` coercion: blank, decimal (with exponent),
/// `Infinity`, or an unsigned `0x`/`0o`/`0b` literal
fn is_numeric(word: &str) -> bool {
    let word = word.trim();
    if word.is_empty() {
        return true;
    }

    let radix = match word.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &word[2..];
        return !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix));
    }

    let unsigned = word.strip_prefix(['+', '-']).unwrap_or(word);
    if unsigned == "Infinity" {
        return true;
    }

    // f64 parsing also accepts inf/nan spellings that JavaScript rejects
    unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        && unsigned.parse::<f64>().is_ok()
}

/// Keywords of one segment: split on `-`/`_`, without stopwords and numbers
fn segment_words(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .split(['-', '_'])
        .filter(|w| !is_stopword(w) && !is_numeric(w))
}

/// Score accumulator that remembers first-seen order for stable ranking
#[derive(Default)]
struct ThemeScores {
    order: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl ThemeScores {
    fn add(&mut self, word: String, weight: u64) {
        match self.index.get(&word) {
            Some(&i) => self.order[i].1 += weight,
            None => {
                self.index.insert(word.clone(), self.order.len());
                self.order.push((word, weight));
            }
        }
    }

    fn add_url(mut self, url: &Url) -> Self {
        let segments = path_segments(url)
            .into_iter()
            .filter(|s| s.chars().count() >= MIN_SEGMENT_CHARS);

        for (position, segment) in segments.enumerate() {
            let weight = segment_weight(position);
            for word in segment_words(segment) {
                self.add(word.to_lowercase(), weight);
            }
        }
        self
    }

    fn ranked(self, limit: usize) -> Vec<ThemeEntry> {
        let mut ranked = self.order;
        // Stable: ties keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(name, score)| ThemeEntry { name, score })
            .collect()
    }
}

/// Rank the top themes across a URL list.
///
/// Positions count among segments long enough to qualify, so `/en/shop`
/// scores `shop` at position 0. URLs that do not parse are skipped.
pub fn extract_themes<S: AsRef<str>>(urls: &[S]) -> Vec<ThemeEntry> {
    urls.iter()
        .filter_map(|raw| Url::parse(raw.as_ref()).ok())
        .fold(ThemeScores::default(), |scores, url| scores.add_url(&url))
        .ranked(MAX_THEMES)
}
