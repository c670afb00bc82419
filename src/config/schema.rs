//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Credential exchange and model hosting settings.
    pub upstream: UpstreamConfig,

    /// Analytics collector settings.
    pub analytics: AnalyticsConfig,

    /// Request size limits for generation endpoints.
    pub generation: GenerationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Security hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream model service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// IAM token exchange URL.
    pub iam_url: String,

    /// Server-held API key exchanged for bearer tokens.
    /// Usually supplied through `RELAY_API_KEY`.
    pub api_key: String,

    /// Project identifier sent with every model request.
    pub project_id: String,

    /// Model identifier sent with every model request.
    pub model_id: String,

    /// Model host used when the client does not name one.
    pub default_endpoint: String,

    /// Chat path appended to the model host.
    pub chat_path: String,

    /// Model hosts a client may name. Empty allows any host.
    pub allowed_endpoints: Vec<String>,

    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,

    /// Timeout for each upstream call in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            iam_url: "https://iam.cloud.ibm.com/identity/token".to_string(),
            api_key: String::new(),
            project_id: String::new(),
            model_id: "ibm/granite-3-8b-instruct".to_string(),
            default_endpoint: "https://us-south.ml.cloud.ibm.com".to_string(),
            chat_path: "/ml/v1/text/chat?version=2023-05-29".to_string(),
            allowed_endpoints: Vec::new(),
            max_tokens: 2000,
            temperature: 0.7,
            top_p: 1.0,
            timeout_secs: 60,
        }
    }
}

/// Analytics forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Forward tracked events to the collector.
    pub enabled: bool,

    /// Collector track endpoint.
    pub collector_url: String,

    /// Collector write key, sent as the basic-auth user.
    /// Usually supplied through `RELAY_ANALYTICS_WRITE_KEY`.
    pub write_key: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            collector_url: "https://api.segment.io/v1/track".to_string(),
            write_key: String::new(),
        }
    }
}

/// Upper bounds on requested output sizes.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_count: usize,
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_count: 100,
            max_rows: 100,
            max_cols: 30,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 120 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum body size in bytes.
    pub max_body_size: usize,
    /// Browser origins allowed by CORS. Empty allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 1024 * 1024, // 1MB
            cors_allowed_origins: Vec::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            project_id = "proj-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.project_id, "proj-1");
        assert_eq!(config.upstream.timeout_secs, 60);
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
        assert!(!config.analytics.enabled);
        assert_eq!(config.generation.max_cols, 30);
    }

    #[test]
    fn test_tls_section() {
        let config: RelayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8443"
            tls = { cert_path = "cert.pem", key_path = "key.pem" }
            "#,
        )
        .unwrap();

        let tls = config.listener.tls.expect("tls configured");
        assert_eq!(tls.cert_path, "cert.pem");
    }
}
