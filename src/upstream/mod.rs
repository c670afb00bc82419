//! Upstream collaborators.
//!
//! # Data Flow
//! ```text
//! API key (server-held)
//!     → iam.rs (exchange for bearer token)
//! bearer token + prompt
//!     → model.rs (chat request → response envelope → RawModelText)
//! browser event
//!     → analytics.rs (best-effort forward to collector)
//! ```
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (connection pooling)
//! - Per-call timeout taken from the live config snapshot
//! - No retries: every failure is reported once to the caller

pub mod analytics;
pub mod iam;
pub mod model;

use std::fmt;
use thiserror::Error;

pub use analytics::{AnalyticsForwarder, TrackEvent};
pub use iam::{AccessToken, TokenClient};
pub use model::{extract_text, resolve_endpoint, ChatMessage, ChatRequest, ModelClient};

/// Which upstream a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Iam,
    Model,
    Analytics,
}

impl Service {
    /// Label used in metrics.
    pub fn label(self) -> &'static str {
        match self {
            Service::Iam => "iam",
            Service::Model => "model",
            Service::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Iam => write!(f, "credential service"),
            Service::Model => write!(f, "model service"),
            Service::Analytics => write!(f, "analytics collector"),
        }
    }
}

/// Errors that can occur while talking to upstream services.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, timeout, or body decoding failure.
    #[error("{service} request failed: {source}")]
    Transport {
        service: Service,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status { service: Service, status: u16 },

    /// Model response matched none of the known envelope shapes.
    #[error("Unexpected response structure from {0}")]
    UnexpectedShape(Service),

    /// Client-supplied model endpoint is malformed or not allowed.
    #[error("Invalid model endpoint: {0}")]
    InvalidEndpoint(String),

    /// A server-held credential is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
