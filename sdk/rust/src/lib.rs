//! Client for the LLM relay HTTP API.

mod client;

pub use client::{
    AccessToken, GeneratedTable, ListRequest, RelayClient, SdkError, TableRequest, TrackEvent,
};
