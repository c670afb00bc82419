//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    check_url(&mut errors, "upstream.iam_url", &config.upstream.iam_url);
    check_url(&mut errors, "upstream.default_endpoint", &config.upstream.default_endpoint);
    for endpoint in &config.upstream.allowed_endpoints {
        check_url(&mut errors, "upstream.allowed_endpoints", endpoint);
    }

    if !config.upstream.chat_path.starts_with('/') {
        errors.push(ValidationError::new("upstream.chat_path", "must start with '/'"));
    }
    if config.upstream.model_id.trim().is_empty() {
        errors.push(ValidationError::new("upstream.model_id", "must not be empty"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }
    if !(0.0..=2.0).contains(&config.upstream.temperature) {
        errors.push(ValidationError::new("upstream.temperature", "must be within 0.0..=2.0"));
    }
    if !(0.0..=1.0).contains(&config.upstream.top_p) {
        errors.push(ValidationError::new("upstream.top_p", "must be within 0.0..=1.0"));
    }

    if config.analytics.enabled {
        check_url(&mut errors, "analytics.collector_url", &config.analytics.collector_url);
    }

    let generation = &config.generation;
    if generation.max_count == 0 || generation.max_rows == 0 || generation.max_cols == 0 {
        errors.push(ValidationError::new("generation", "limits must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            "must be \"pretty\" or \"json\"",
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RelayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.upstream.iam_url = "ftp://iam.example.com".into();
        config.upstream.timeout_secs = 0;
        config.generation.max_rows = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "upstream.iam_url",
                "upstream.timeout_secs",
                "generation"
            ]
        );
    }

    #[test]
    fn test_collector_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.analytics.collector_url = "nonsense".into();
        assert!(validate_config(&config).is_ok());

        config.analytics.enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new("upstream.top_p", "must be within 0.0..=1.0");
        assert_eq!(err.to_string(), "upstream.top_p: must be within 0.0..=1.0");
    }
}
