//! Tolerant JSON repair for model output.
//!
//! Models frequently emit Python-flavoured literals: single-quoted strings,
//! bare object keys and trailing commas. `repair_json` rewrites those into
//! strict JSON. It is only applied after a direct parse has already failed,
//! so well-formed input never passes through it.
//!
//! # Transformation order
//! 1. trailing commas before `]` / `}` removed
//! 2. single-quoted strings between JSON punctuation → double-quoted,
//!    repeated until none are left
//! 3. bare object keys → double-quoted keys
//!
//! Trailing commas go first so that `'B',]` closes like `'B']`. A single
//! quote only closes a string when punctuation follows it, so apostrophes
//! inside elements (`['Joe's Diner', 'Globex']`) survive.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([\]}])").expect("trailing comma pattern"));

/// A single-quoted string opened after `[ { , :` and closed before `, ] } :`.
/// The closing punctuation is consumed, so neighbouring strings are picked
/// up on the next pass.
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\[{,:]\s*)'(.*?)'(\s*[,\]}:])").expect("single-quoted string pattern")
});

static BARE_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("bare key pattern")
});

/// Rewrite near-JSON text into strict JSON, best effort.
///
/// The result is not guaranteed to parse; callers treat a second parse
/// failure as "no structured data".
pub fn repair_json(text: &str) -> String {
    let text = TRAILING_COMMA.replace_all(text, "${1}").into_owned();
    let text = requote(text);
    BARE_KEY.replace_all(&text, "${1}\"${2}\":").into_owned()
}

/// Every pass rewrites at least one pair of single quotes or returns.
fn requote(mut text: String) -> String {
    loop {
        let next = SINGLE_QUOTED
            .replace_all(&text, |caps: &Captures<'_>| {
                format!("{}\"{}\"{}", &caps[1], caps[2].replace('"', "\\\""), &caps[3])
            })
            .into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parses(text: &str) -> Value {
        serde_json::from_str(&repair_json(text)).expect("repaired text should parse")
    }

    #[test]
    fn test_single_quoted_list() {
        let value = parses("['Acme Corp', 'Globex', 'Initech']");
        assert_eq!(value, serde_json::json!(["Acme Corp", "Globex", "Initech"]));
    }

    #[test]
    fn test_apostrophe_inside_element() {
        let value = parses("['Joe's Diner', 'Globex']");
        assert_eq!(value, serde_json::json!(["Joe's Diner", "Globex"]));
    }

    #[test]
    fn test_bare_keys_and_trailing_commas() {
        let value = parses("{headers: ['A', 'B',], rows: [['1', '2'],],}");
        assert_eq!(value["headers"], serde_json::json!(["A", "B"]));
        assert_eq!(value["rows"], serde_json::json!([["1", "2"]]));
    }

    #[test]
    fn test_single_quoted_keys_and_values() {
        let value = parses("{'name': 'Globex', 'size': 3}");
        assert_eq!(value["name"], "Globex");
        assert_eq!(value["size"], 3);
    }

    #[test]
    fn test_quoted_strings_next_to_numbers() {
        let value = parses("[['Alice', 30, 'NY'], ['Bob', 25.5, 'LA']]");
        assert_eq!(value, serde_json::json!([["Alice", 30, "NY"], ["Bob", 25.5, "LA"]]));
    }

    #[test]
    fn test_embedded_double_quote_is_escaped() {
        let value = parses("{'size': '27\" Monitor'}");
        assert_eq!(value["size"], "27\" Monitor");
    }

    #[test]
    fn test_valid_json_unchanged() {
        let text = r#"{"headers": ["A"], "rows": [["x"]]}"#;
        assert_eq!(repair_json(text), text);
    }
}
