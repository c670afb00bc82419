//! LLM relay library.
//!
//! A thin HTTP relay between a browser client, a hosted language model and
//! an analytics collector. Server-held credentials are injected on the way
//! out; model output is normalized into exact-size lists and tables on the
//! way back.

pub mod config;
pub mod generation;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod normalize;
pub mod observability;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
