//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, body limit, CORS, security headers)
//! - Bind server to listener, plain or TLS
//! - Swap in reloaded configuration while serving
//! - Stop gracefully on shutdown

use arc_swap::ArcSwap;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{RelayConfig, SecurityConfig};
use crate::generation::GenerationService;
use crate::http::{handlers, request, response};
use crate::security::{headers, limits};
use crate::upstream::AnalyticsForwarder;

const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Live configuration; replaced wholesale on reload.
    pub config: Arc<ArcSwap<RelayConfig>>,
    pub generation: GenerationService,
    pub analytics: AnalyticsForwarder,
}

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: Arc<ArcSwap<RelayConfig>>,
}

impl RelayServer {
    /// Create a new server with the given configuration.
    ///
    /// Fails only if the outbound HTTP client cannot be built.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("llm-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let shared = Arc::new(ArcSwap::from_pointee(config.clone()));
        let state = AppState {
            config: shared.clone(),
            generation: GenerationService::new(http.clone()),
            analytics: AnalyticsForwarder::new(http),
        };

        Ok(Self {
            router: Self::build_router(&config, state),
            config: shared,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers are fixed at startup; reloads only affect what handlers read
    /// from the config snapshot.
    pub fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/generate", post(handlers::generate_list))
            .route("/generateTable", post(handlers::generate_table))
            .route("/token", post(handlers::issue_token))
            .route("/track", post(handlers::track))
            .route("/health", get(handlers::health))
            .with_state(state);

        if config.security.enable_headers {
            router = router
                .layer(headers::nosniff_layer())
                .layer(headers::frame_deny_layer());
        }

        let timeout = Duration::from_secs(config.timeouts.request_secs);
        with_request_limits(router, timeout, &config.security)
            .layer(headers::cors_layer(&config.security))
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(request::make_span))
            .layer(request::set_request_id_layer())
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<RelayConfig> {
        self.config.load_full()
    }

    /// Router for in-process use (e.g. `tower::ServiceExt::oneshot`).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        apply_config_updates(self.config.clone(), config_updates);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server over TLS on `addr`.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        config_updates: mpsc::UnboundedReceiver<RelayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        apply_config_updates(self.config.clone(), config_updates);

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            drain.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Request timeout and body limit, with their 408 / 413 rendered as `{ error }`.
#[allow(deprecated)]
fn with_request_limits(router: Router, timeout: Duration, security: &SecurityConfig) -> Router {
    router
        .layer(TimeoutLayer::new(timeout))
        .layer(limits::body_limit(security))
        .layer(middleware::map_response(response::json_error_body))
}

/// Store each reloaded config into the live snapshot.
fn apply_config_updates(
    config: Arc<ArcSwap<RelayConfig>>,
    mut updates: mpsc::UnboundedReceiver<RelayConfig>,
) {
    tokio::spawn(async move {
        while let Some(new_config) = updates.recv().await {
            let current = config.load();
            if current.listener.bind_address != new_config.listener.bind_address
                || current.timeouts.request_secs != new_config.timeouts.request_secs
                || current.security.max_body_size != new_config.security.max_body_size
            {
                tracing::warn!("Listener, timeout and body limit changes take effect on restart");
            }
            config.store(Arc::new(new_config));
            tracing::info!("Configuration reloaded");
        }
    });
}
