//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack, hot-reloaded config)
//!     → request.rs (request ID, request span)
//!     → handlers.rs (validate, call generation service or forwarder)
//!     → response.rs (typed errors → status + `{ error }` body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, RelayServer};
