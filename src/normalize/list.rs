//! List-mode normalization.
//!
//! Parsing strategies, first success wins:
//! 1. Bracketed JSON array (direct, then repaired)
//! 2. Single comma-separated line
//! 3. One item per line, list markers stripped

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::normalize::repair::repair_json;
use crate::normalize::value_to_text;

/// Leading list markers such as `1.`, `-` or `*`, with surrounding whitespace.
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.*\s-]+").expect("list marker pattern"));

/// Normalize free model text into exactly `count` strings.
pub fn normalize_list(raw: &str, count: usize) -> Vec<String> {
    fit_to_count(parse_items(raw), count)
}

/// Extract candidate items from raw text without resizing.
pub fn parse_items(raw: &str) -> Vec<String> {
    let text = raw.trim();

    if let Some(items) = parse_bracketed(text) {
        return items;
    }

    if text.contains(',') && !text.contains('\n') {
        return text
            .split(',')
            .map(strip_quotes)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();
    }

    text.lines()
        .map(|line| strip_quotes(&LIST_MARKER.replace(line, "")).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Resize to exactly `count`, repeating collected values cyclically.
pub fn fit_to_count(mut items: Vec<String>, count: usize) -> Vec<String> {
    if items.is_empty() {
        return vec![String::new(); count];
    }

    items.truncate(count);
    let collected = items.len();
    for i in collected..count {
        let value = items[i % collected].clone();
        items.push(value);
    }
    items
}

fn parse_bracketed(text: &str) -> Option<Vec<String>> {
    if !text.starts_with('[') {
        return None;
    }
    let end = text.rfind(']')?;
    let candidate = &text[..=end];

    let values: Vec<Value> = serde_json::from_str(candidate)
        .or_else(|_| serde_json::from_str(&repair_json(candidate)))
        .ok()?;

    Some(
        values
            .iter()
            .map(value_to_text)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
    )
}

/// Trim and remove one layer of matching surrounding quotes.
fn strip_quotes(item: &str) -> &str {
    let item = item.trim();
    for quote in ['"', '\''] {
        if item.len() >= 2 && item.starts_with(quote) && item.ends_with(quote) {
            return item[1..item.len() - 1].trim();
        }
    }
    item
}
