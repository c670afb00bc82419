//! LLM relay
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                    LLM RELAY                      │
//!   Browser request     │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ────────────────────┼─▶│   net   │──▶│   http   │──▶│  generation  │───┼──▶ IAM / model host
//!                       │  │listener │   │ handlers │   │   service    │   │
//!                       │  └─────────┘   └────┬─────┘   └──────┬───────┘   │
//!                       │                     │                ▼           │
//!                       │                     │         ┌──────────────┐   │
//!   { data } / table    │                     │         │  normalize   │   │
//!   ◀───────────────────┼─────────────────────┘◀────────│ list / table │   │
//!                       │                     └────────▶ upstream::analytics ──▶ collector
//!                       │                                                  │
//!                       │  config (toml + env + hot reload) · observability │
//!                       │  security (cors, limits) · lifecycle (shutdown)  │
//!                       └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use llm_relay::config::{config_from_env, load_config, watcher::ConfigWatcher};
use llm_relay::lifecycle::Shutdown;
use llm_relay::observability::{logging, metrics};
use llm_relay::{net, RelayServer};

#[derive(Parser)]
#[command(name = "llm-relay", version, about = "HTTP relay for hosted language models")]
struct Args {
    /// TOML configuration file. Defaults plus environment when omitted.
    #[arg(short, long, env = "RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => config_from_env()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!("llm-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        model_id = %config.upstream.model_id,
        analytics_enabled = config.analytics.enabled,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );
    if config.upstream.api_key.is_empty() {
        tracing::warn!("No API key configured; set RELAY_API_KEY");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher must stay alive for reloads to fire.
    let (config_updates, _watcher) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        (None, true) => {
            tracing::warn!("--watch ignored without --config");
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = RelayServer::new(config)?;

    match tls {
        Some(tls) => {
            let addr = net::listener::parse_addr(&bind_address)?;
            let rustls = net::load_tls_config(&tls).await?;
            server
                .run_tls(addr, rustls, config_updates, shutdown.subscribe())
                .await?;
        }
        None => {
            let listener = net::bind(&bind_address).await?;
            server
                .run(listener, config_updates, shutdown.subscribe())
                .await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
