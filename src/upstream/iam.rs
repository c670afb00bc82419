//! IAM credential exchange.

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::{Service, UpstreamError, UpstreamResult};

const GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

/// Bearer token issued by the credential service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

/// Exchanges the server-held API key for bearer tokens.
#[derive(Clone)]
pub struct TokenClient {
    http: reqwest::Client,
}

impl TokenClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Exchange `upstream.api_key` for a bearer token. Never retried.
    pub async fn exchange(&self, upstream: &UpstreamConfig) -> UpstreamResult<AccessToken> {
        if upstream.api_key.is_empty() {
            return Err(UpstreamError::MissingCredential("api key"));
        }

        let response = self
            .http
            .post(&upstream.iam_url)
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", GRANT_TYPE), ("apikey", upstream.api_key.as_str())])
            .timeout(Duration::from_secs(upstream.timeout_secs))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Token exchange rejected");
            metrics::record_upstream(Service::Iam.label(), "error");
            return Err(UpstreamError::Status {
                service: Service::Iam,
                status: status.as_u16(),
            });
        }

        let token = response.json::<AccessToken>().await.map_err(transport)?;
        metrics::record_upstream(Service::Iam.label(), "ok");
        tracing::debug!(expires_in = ?token.expires_in, "Token exchange succeeded");
        Ok(token)
    }
}

fn transport(source: reqwest::Error) -> UpstreamError {
    metrics::record_upstream(Service::Iam.label(), "error");
    UpstreamError::Transport {
        service: Service::Iam,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_without_expiry() {
        let token: AccessToken = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, None);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_rejected_locally() {
        let client = TokenClient::new(reqwest::Client::new());
        let err = client.exchange(&UpstreamConfig::default()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingCredential("api key")));
    }
}
