//! Table-mode normalization.

use rand::RngCore;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::normalize::headers::fallback_headers;
use crate::normalize::repair::repair_json;
use crate::normalize::rows::fallback_rows;
use crate::normalize::{value_to_text, NormalizedTable, TableNormalization};

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z]*\s*").expect("fence open pattern"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("fence close pattern"));

/// Whatever could be recovered from the model's attempted JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Recover headers and rows from raw model text.
///
/// Never fails: anything unusable yields an empty `ParsedTable`, leaving the
/// caller to fall back to synthesis.
pub fn parse_table(raw: &str, rows: usize, cols: usize) -> ParsedTable {
    let text = strip_code_fence(raw.trim());

    let value = match serde_json::from_str::<Value>(&text)
        .or_else(|_| serde_json::from_str::<Value>(&repair_json(&text)))
    {
        Ok(value) => value,
        Err(_) => return ParsedTable::default(),
    };

    let (Some(headers), Some(body)) = (
        value.get("headers").and_then(Value::as_array),
        value.get("rows").and_then(Value::as_array),
    ) else {
        return ParsedTable::default();
    };

    let headers = headers
        .iter()
        .map(value_to_text)
        .filter(|h| !h.contains(['[', ']', '{', '}']))
        .take(cols)
        .collect();

    let parsed_rows = body
        .iter()
        .filter_map(Value::as_array)
        .map(|cells| {
            let mut row: Vec<String> = cells.iter().take(cols).map(value_to_text).collect();
            row.resize(cols, String::new());
            row
        })
        .filter(|row| !row.is_empty())
        .take(rows)
        .collect();

    ParsedTable {
        headers,
        rows: parsed_rows,
    }
}

/// Normalize into exactly `cols` headers and `rows` rows of `cols` cells.
pub fn normalize_table(raw: &str, prompt: &str, rows: usize, cols: usize) -> TableNormalization {
    normalize_table_with_rng(raw, prompt, rows, cols, &mut rand::thread_rng())
}

/// Same as [`normalize_table`], drawing fallback values from `rng`.
pub fn normalize_table_with_rng<R: RngCore>(
    raw: &str,
    prompt: &str,
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> TableNormalization {
    let parsed = parse_table(raw, rows, cols);

    let headers_synthesized = parsed.headers.len() != cols;
    let headers = if headers_synthesized {
        fallback_headers(prompt, cols)
    } else {
        parsed.headers
    };

    let rows_synthesized = parsed.rows.len() != rows;
    let body = if rows_synthesized {
        fallback_rows(&headers, rows, rng)
    } else {
        parsed.rows
    };

    TableNormalization {
        table: NormalizedTable { headers, rows: body },
        headers_synthesized,
        rows_synthesized,
    }
}

fn strip_code_fence(text: &str) -> String {
    let text = FENCE_OPEN.replace(text, "");
    FENCE_CLOSE.replace(&text, "").trim().to_string()
}
