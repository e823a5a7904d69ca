//! Text classification and metadata extraction.
//!
//! Content-type detection and tag extraction run on every finalized
//! chunk. [`profile_document`] computes whole-document statistics
//! (word count, reading time, keywords, categories) for inspection.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::types::ContentType;

/// `#word` inline tags
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());

/// Anything that is neither a word character nor whitespace
static NON_WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Words per minute used for reading time estimates
const READING_SPEED_WPM: usize = 200;

/// Number of keywords reported by [`profile_document`]
const MAX_KEYWORDS: usize = 5;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
];

/// Classify a chunk of text.
///
/// Rules are checked in priority order and the first match wins:
/// code, documentation, task-list, table, text.
pub fn detect_content_type(text: &str) -> ContentType {
    if text.contains("```") && text.contains("function") {
        return ContentType::Code;
    }

    let (mut has_h1, mut has_h2) = (false, false);
    for line in text.lines() {
        match heading_level(line) {
            Some(1) => has_h1 = true,
            Some(2) => has_h2 = true,
            _ => {}
        }
    }
    if has_h1 && has_h2 {
        return ContentType::Documentation;
    }

    if text.contains("- [ ]") || text.contains("- [x]") || text.contains("- [X]") {
        return ContentType::TaskList;
    }

    if text.contains('|') && text.contains("---") {
        return ContentType::Table;
    }

    ContentType::Text
}

/// ATX heading level of a markdown line (`# Title` is 1, `## Sub` is 2)
fn heading_level(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }

    // The marker must be followed by whitespace or end the line,
    // otherwise `#tag` would count as a heading
    match trimmed[level..].chars().next() {
        None => Some(level),
        Some(c) if c.is_whitespace() => Some(level),
        Some(_) => None,
    }
}

/// Extract the distinct `#word` tags in `text`, without the `#`
pub fn extract_tags(text: &str) -> BTreeSet<String> {
    TAG_PATTERN
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Whole-document statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentProfile {
    pub word_count: usize,
    pub character_count: usize,
    /// Minutes at 200 words per minute, rounded up
    pub reading_time_minutes: usize,
    /// Most frequent non-stop-words, most frequent first
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub tags: BTreeSet<String>,
}

/// Compute word counts, reading time, keywords and categories
pub fn profile_document(text: &str) -> DocumentProfile {
    let word_count = text.split_whitespace().count();

    DocumentProfile {
        word_count,
        character_count: text.chars().count(),
        reading_time_minutes: word_count.div_ceil(READING_SPEED_WPM),
        keywords: extract_keywords(text, MAX_KEYWORDS),
        categories: categorize(text),
        tags: extract_tags(text),
    }
}

/// Rank words longer than three characters by frequency, skipping
/// stop words. Ties keep first-occurrence order.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let cleaned = NON_WORD_PATTERN.replace_all(text, "").to_lowercase();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in cleaned.split_whitespace() {
        if word.chars().count() <= 3 || stop_words.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    // Stable sort preserves first-occurrence order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Coarse document categories; `general` when nothing else applies
fn categorize(text: &str) -> Vec<String> {
    let mut categories = Vec::new();

    if ["function", "class", "import"].iter().any(|k| text.contains(k)) {
        categories.push("code");
    }
    if ["TODO", "FIXME", "BUG"].iter().any(|k| text.contains(k)) {
        categories.push("task");
    }
    if text.contains("http") || text.contains("www") {
        categories.push("reference");
    }
    if text.contains("##") {
        categories.push("documentation");
    }
    if categories.is_empty() {
        categories.push("general");
    }

    categories.into_iter().map(String::from).collect()
}
