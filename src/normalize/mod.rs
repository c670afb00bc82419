//! Model-output normalization.
//!
//! # Data Flow
//! ```text
//! RawModelText
//!     → list.rs   (JSON array | comma line | lines) → resize to `count`
//!     → table.rs  (fence strip → JSON parse → repair.rs → shape check)
//!         → headers.rs (keyword templates) when header count is wrong
//!         → rows.rs    (rule-table synthesis) when row count is wrong
//! ```
//!
//! # Design Decisions
//! - Pure functions: no I/O, no logging, no shared state
//! - Output cardinality is exact regardless of what the model returned
//! - Fallback randomness is injectable; production uses `thread_rng`

pub mod headers;
pub mod list;
pub mod repair;
pub mod rows;
pub mod table;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use headers::fallback_headers;
pub use list::normalize_list;
pub use repair::repair_json;
pub use rows::fallback_rows;
pub use table::{normalize_table, normalize_table_with_rng, parse_table, ParsedTable};

/// Headers plus rows of fixed dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A normalized table and which parts of it had to be synthesized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNormalization {
    pub table: NormalizedTable,
    pub headers_synthesized: bool,
    pub rows_synthesized: bool,
}

/// Text form of a JSON value: strings unquoted, `null` empty, anything else
/// as its JSON encoding.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
