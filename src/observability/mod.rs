//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, generation service, upstream clients produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every log line of a request
//! - Metrics are cheap (atomic increments) and no-ops until an exporter is installed
//! - The normalizer never logs; callers record fallbacks instead

pub mod logging;
pub mod metrics;
