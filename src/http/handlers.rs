//! Route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::time::Instant;

use crate::generation::{ListRequest, ListResponse, TableRequest};
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{check_list, check_table};
use crate::upstream::TrackEvent;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// Record metrics for a finished request and render it.
fn finish(route: &'static str, start: Instant, result: Result<Response, ApiError>) -> Response {
    let response = result.unwrap_or_else(|e| e.into_response());
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

/// `POST /generate`
pub async fn generate_list(
    State(state): State<AppState>,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    finish("generate", start, list(&state, payload).await)
}

async fn list(
    state: &AppState,
    payload: Result<Json<ListRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let config = state.config.load_full();
    check_list(&request.prompt, request.count, &config.generation)?;

    let data = state.generation.generate_list(&config, &request).await?;
    tracing::info!(count = data.len(), "List generated");
    Ok(Json(ListResponse { data }).into_response())
}

/// `POST /generateTable`
pub async fn generate_table(
    State(state): State<AppState>,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    finish("generateTable", start, table(&state, payload).await)
}

async fn table(
    state: &AppState,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let config = state.config.load_full();
    check_table(&request.prompt, request.rows, request.cols, &config.generation)?;

    let table = state.generation.generate_table(&config, &request).await?;
    tracing::info!(rows = table.rows.len(), cols = table.headers.len(), "Table generated");
    Ok(Json(table).into_response())
}

/// `POST /token`
pub async fn issue_token(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let config = state.config.load_full();
    let result = state
        .generation
        .issue_token(&config)
        .await
        .map(|token| Json(token).into_response())
        .map_err(ApiError::from);
    finish("token", start, result)
}

/// `POST /track`
///
/// Acknowledged whether or not forwarding succeeds.
pub async fn track(
    State(state): State<AppState>,
    payload: Result<Json<TrackEvent>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    finish("track", start, forward_event(&state, payload).await)
}

async fn forward_event(
    state: &AppState,
    payload: Result<Json<TrackEvent>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(event) = payload?;
    let config = state.config.load_full();

    match state.analytics.forward(&config.analytics, &event).await {
        Ok(true) => tracing::debug!(event = %event.event, "Analytics event forwarded"),
        Ok(false) => tracing::trace!(event = %event.event, "Analytics disabled, event dropped"),
        Err(e) => tracing::warn!(event = %event.event, error = %e, "Analytics forwarding failed"),
    }
    Ok(Json(json!({ "success": true })).into_response())
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
