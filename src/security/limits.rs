//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size
//! - Bound list counts and table dimensions
//! - Reject empty prompts
//!
//! # Design Decisions
//! - Limits checked before any upstream call (early rejection)
//! - Body limit returns 413 Payload Too Large; bound violations return 400

use thiserror::Error;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::{GenerationConfig, SecurityConfig};

/// A generation request outside the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LimitError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    #[error("{field} must be at most {max}")]
    TooLarge { field: &'static str, max: usize },
}

/// Cap request bodies at `security.max_body_size`.
pub fn body_limit(config: &SecurityConfig) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(config.max_body_size)
}

/// Validate a list request.
pub fn check_list(prompt: &str, count: usize, limits: &GenerationConfig) -> Result<(), LimitError> {
    check_prompt(prompt)?;
    check_bound("count", count, limits.max_count)
}

/// Validate a table request.
pub fn check_table(
    prompt: &str,
    rows: usize,
    cols: usize,
    limits: &GenerationConfig,
) -> Result<(), LimitError> {
    check_prompt(prompt)?;
    check_bound("rows", rows, limits.max_rows)?;
    check_bound("cols", cols, limits.max_cols)
}

fn check_prompt(prompt: &str) -> Result<(), LimitError> {
    if prompt.trim().is_empty() {
        return Err(LimitError::EmptyPrompt);
    }
    Ok(())
}

fn check_bound(field: &'static str, value: usize, max: usize) -> Result<(), LimitError> {
    if value == 0 {
        return Err(LimitError::Zero(field));
    }
    if value > max {
        return Err(LimitError::TooLarge { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_bounds() {
        let limits = GenerationConfig::default();
        assert!(check_list("colors", 1, &limits).is_ok());
        assert!(check_list("colors", 100, &limits).is_ok());
        assert_eq!(check_list("colors", 0, &limits), Err(LimitError::Zero("count")));
        assert_eq!(
            check_list("colors", 101, &limits),
            Err(LimitError::TooLarge { field: "count", max: 100 })
        );
    }

    #[test]
    fn test_table_bounds() {
        let limits = GenerationConfig::default();
        assert!(check_table("users", 5, 30, &limits).is_ok());
        assert_eq!(check_table("users", 5, 0, &limits), Err(LimitError::Zero("cols")));
        assert_eq!(
            check_table("users", 5, 31, &limits).unwrap_err().to_string(),
            "cols must be at most 30"
        );
    }

    #[test]
    fn test_empty_prompt() {
        let limits = GenerationConfig::default();
        assert_eq!(check_list("   ", 3, &limits), Err(LimitError::EmptyPrompt));
    }
}
