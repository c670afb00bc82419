//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORS preflight and origin check)
//!     → limits.rs (body size cap, then count/rows/cols bounds)
//!     → Pass to handlers
//! Outgoing response:
//!     → headers.rs (nosniff, frame denial)
//! ```
//!
//! # Design Decisions
//! - Upstream credentials never leave the server
//! - Fail closed: out-of-range requests are rejected before any upstream call
//! - No trust in client input

pub mod headers;
pub mod limits;

pub use limits::{check_list, check_table, LimitError};
