//! Splitting of long note lines into short, actionable items.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// French connectors, tried in order; the first one present wins.
const CONNECTORS: &[&str] = &[
    r"afin\s+de",
    r"pour",
    r"puis",
    r"et",
    r"après",
    r"avant\s+de",
    r"pendant\s+que",
    r"alors\s+que",
    r"mais",
    r"ou",
    r"donc",
    r"car",
    r"ainsi\s+que",
    r"ainsi",
    r"ensuite",
    r"également",
    r"aussi",
];

const MAX_DEPTH: usize = 5;
/// Parts shorter than this are never split further.
const MIN_SPLIT_LEN: usize = 10;
const MIN_ITEM_LEN: usize = 3;

static STRONG_PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.;:!?]\s+").expect("valid regex"));
static PUNCTUATION_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[.;:!?]+$").expect("valid regex"));
static CONNECTOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    CONNECTORS
        .iter()
        .map(|c| Regex::new(&format!(r"(?i)\s+{c}\s+")).expect("valid regex"))
        .collect()
});

/// Split long items on strong punctuation, then on connectors.
///
/// Parts shorter than three characters are dropped and duplicates are
/// removed case-insensitively, keeping the first occurrence.
pub fn split_long_sentences<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        let cleaned = clean_item(item.as_ref());
        if char_len(&cleaned) < MIN_ITEM_LEN {
            continue;
        }

        for part in split_item(&cleaned) {
            let part = clean_item(&part);
            if char_len(&part) < MIN_ITEM_LEN {
                continue;
            }
            if seen.insert(part.to_lowercase()) {
                result.push(part);
            }
        }
    }

    result
}

fn clean_item(item: &str) -> String {
    let collapsed = item.split_whitespace().collect::<Vec<_>>().join(" ");
    if PUNCTUATION_ONLY.is_match(&collapsed) {
        return String::new();
    }
    collapsed
}

fn split_item(item: &str) -> Vec<String> {
    if char_len(item) < MIN_SPLIT_LEN {
        return vec![item.to_string()];
    }

    let parts: Vec<String> = STRONG_PUNCTUATION
        .split(item)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .flat_map(|part| split_on_connectors(part, 0))
        .collect();

    if parts.is_empty() {
        vec![item.to_string()]
    } else {
        parts
    }
}

fn split_on_connectors(text: &str, depth: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if depth > MAX_DEPTH || char_len(text) < MIN_SPLIT_LEN {
        return vec![text.to_string()];
    }

    let Some(connector) = CONNECTOR_PATTERNS.iter().find(|re| re.is_match(text)) else {
        return vec![text.to_string()];
    };

    let mut parts = Vec::new();
    for part in connector.split(text).map(str::trim).filter(|p| !p.is_empty()) {
        if char_len(part) >= MIN_SPLIT_LEN {
            parts.extend(split_on_connectors(part, depth + 1));
        } else {
            parts.push(part.to_string());
        }
    }

    if parts.is_empty() {
        vec![text.to_string()]
    } else {
        parts
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
