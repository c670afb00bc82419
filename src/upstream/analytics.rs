//! Best-effort analytics forwarding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::config::AnalyticsConfig;
use crate::observability::metrics;
use crate::upstream::{Service, UpstreamError, UpstreamResult};

const FORWARD_TIMEOUT: Duration = Duration::from_secs(10);

/// A browser-side analytics event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEvent {
    pub event: String,
    pub anonymous_id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Forwards events to the collector with the server-held write key.
#[derive(Clone)]
pub struct AnalyticsForwarder {
    http: reqwest::Client,
}

impl AnalyticsForwarder {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Forward `event`. Returns `Ok(false)` when forwarding is disabled.
    pub async fn forward(&self, config: &AnalyticsConfig, event: &TrackEvent) -> UpstreamResult<bool> {
        if !config.enabled {
            return Ok(false);
        }
        if config.write_key.is_empty() {
            return Err(UpstreamError::MissingCredential("analytics write key"));
        }

        let response = self
            .http
            .post(&config.collector_url)
            .basic_auth(&config.write_key, Some(""))
            .json(event)
            .timeout(FORWARD_TIMEOUT)
            .send()
            .await
            .map_err(|source| {
                metrics::record_upstream(Service::Analytics.label(), "error");
                UpstreamError::Transport {
                    service: Service::Analytics,
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            metrics::record_upstream(Service::Analytics.label(), "error");
            return Err(UpstreamError::Status {
                service: Service::Analytics,
                status: status.as_u16(),
            });
        }

        metrics::record_upstream(Service::Analytics.label(), "ok");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        let event: TrackEvent = serde_json::from_str(
            r#"{"event": "table_generated", "anonymousId": "anon-1", "properties": {"rows": 3}}"#,
        )
        .unwrap();

        assert_eq!(event.anonymous_id, "anon-1");
        assert_eq!(event.properties["rows"], 3);

        let encoded = serde_json::to_value(&event).unwrap();
        assert_eq!(encoded["anonymousId"], "anon-1");
        assert!(encoded.get("timestamp").is_none());
    }

    #[tokio::test]
    async fn test_disabled_forwarding_is_skipped() {
        let forwarder = AnalyticsForwarder::new(reqwest::Client::new());
        let event = TrackEvent {
            event: "page_view".into(),
            anonymous_id: "a".into(),
            properties: Map::new(),
            timestamp: None,
        };
        let forwarded = forwarder.forward(&AnalyticsConfig::default(), &event).await.unwrap();
        assert!(!forwarded);
    }
}
