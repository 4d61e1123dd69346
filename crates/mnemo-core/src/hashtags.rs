//! Inline hashtag extraction from captured text.
//!
//! Explicit request tags and inline `#tags` found in the extracted text
//! are merged into one lowercase, sorted, deduplicated set.

use regex::Regex;
use std::collections::BTreeSet;

/// Extract hashtags from text content.
///
/// Returns lowercase, deduplicated, sorted tag names.
///
/// # Rules
///
/// 1. Hashtags start with `#` followed by a letter
/// 2. May contain letters, numbers, hyphens, and underscores
/// 3. URL fragments are excluded (e.g., `https://example.com/#anchor`)
/// 4. All tags are normalized to lowercase
pub fn extract_inline_hashtags(content: &str) -> Vec<String> {
    let without_urls = remove_urls(content);

    let hashtag_pattern = Regex::new(r"(?:^|[^a-zA-Z0-9_-])#([a-zA-Z][a-zA-Z0-9_-]*)").unwrap();

    let mut tags = BTreeSet::new();
    for cap in hashtag_pattern.captures_iter(&without_urls) {
        if let Some(tag) = cap.get(1) {
            tags.insert(tag.as_str().to_lowercase());
        }
    }
    tags.into_iter().collect()
}

/// Merge explicit tags with inline hashtags extracted from content.
///
/// Returns a deduplicated, sorted vector of all tags.
pub fn merge_tags(explicit_tags: &[String], content: &str) -> Vec<String> {
    let mut all_tags: BTreeSet<String> = explicit_tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    for tag in extract_inline_hashtags(content) {
        all_tags.insert(tag);
    }

    all_tags.into_iter().collect()
}

/// Strip URLs so their fragments are not read as hashtags.
fn remove_urls(content: &str) -> String {
    let url_pattern = Regex::new(r"https?://\S+").unwrap();
    url_pattern.replace_all(content, "").to_string()
}
