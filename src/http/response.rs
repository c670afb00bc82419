//! Error responses.
//!
//! # Responsibilities
//! - Map typed failures to HTTP status codes
//! - Render every failure as `{ "error": "<message>" }`, including the
//!   bodiless 408 / 413 responses produced by the timeout and body-limit layers
//!
//! # Design Decisions
//! - Upstream failures are 502 Bad Gateway, never passed through verbatim
//! - Client mistakes are 400; missing server credentials are 500
//! - Server-side details (transport errors) are logged, not returned

use axum::extract::rejection::JsonRejection;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::security::LimitError;
use crate::upstream::{Service, UpstreamError};

/// Failure of a relay endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Limit(#[from] LimitError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("request timed out")]
    Timeout,

    #[error("request body too large")]
    PayloadTooLarge,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Limit(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(UpstreamError::InvalidEndpoint(_)) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(UpstreamError::MissingCredential(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Message returned to the client.
    fn client_message(&self) -> String {
        match self {
            ApiError::Upstream(UpstreamError::Transport { service, .. }) => {
                format!("{service} is unreachable")
            }
            ApiError::Upstream(UpstreamError::MissingCredential(_)) => {
                "relay is missing server credentials".to_string()
            }
            ApiError::Upstream(UpstreamError::UnexpectedShape(Service::Model)) => {
                "Unexpected response structure".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Give middleware-generated timeout and body-limit failures a JSON body.
pub async fn json_error_body(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let upstream = ApiError::from(UpstreamError::Status {
            service: Service::Iam,
            status: 401,
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream.client_message(), "credential service returned status 401");

        let endpoint = ApiError::from(UpstreamError::InvalidEndpoint("nope".into()));
        assert_eq!(endpoint.status(), StatusCode::BAD_REQUEST);

        let creds = ApiError::from(UpstreamError::MissingCredential("api key"));
        assert_eq!(creds.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!creds.client_message().contains("api key"));

        let limit = ApiError::from(LimitError::Zero("count"));
        assert_eq!(limit.status(), StatusCode::BAD_REQUEST);
        assert_eq!(limit.client_message(), "count must be greater than 0");
    }

    #[test]
    fn test_unexpected_shape_message() {
        let err = ApiError::from(UpstreamError::UnexpectedShape(Service::Model));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.client_message(), "Unexpected response structure");
    }
}
