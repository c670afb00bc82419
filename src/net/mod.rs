//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! bind address
//!     → listener.rs (plain TCP bind)
//!     → tls.rs (optional rustls config for axum-server)
//!     → Hand off to HTTP layer
//! ```

pub mod listener;
pub mod tls;

pub use listener::bind;
pub use tls::load_tls_config;
