//! outreach-dash - church outreach dashboard service
//!
//! Polls the visit sheet export, derives the dashboard views and serves
//! them with a small static page.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use outreach_common::config::{sheet_export_url, DashboardConfig};
use outreach_dash::api::SessionGate;
use outreach_dash::poller::spawn_poller;
use outreach_dash::sheets_client::SheetsClient;
use outreach_dash::snapshot::SnapshotStore;
use outreach_dash::{build_router, AppState};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "outreach-dash", version, about = "Church outreach dashboard")]
struct Args {
    /// Path to the TOML config file (else $OUTREACH_CONFIG, else the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listen address from the config file
    #[arg(long)]
    bind: Option<String>,

    /// Google Sheet id; replaces the feed URL with that sheet's CSV export
    #[arg(long)]
    sheet_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise the config file level is swapped in once loaded
    let env_filter = EnvFilter::try_from_default_env().ok();
    let has_env_filter = env_filter.is_some();
    let (filter_layer, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting outreach-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let mut config = DashboardConfig::load(args.config.as_deref());
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(sheet_id) = args.sheet_id {
        config.feed_url = sheet_export_url(&sheet_id);
    }

    if !has_env_filter {
        match EnvFilter::try_new(&config.logging.level) {
            Ok(filter) => filter_handle
                .reload(filter)
                .context("applying configured log level")?,
            Err(e) => warn!("Ignoring invalid log level '{}': {}", config.logging.level, e),
        }
    }

    if config.feed_url.trim().is_empty() {
        warn!("No feed URL configured; dashboard will show empty views");
    }

    let gate = SessionGate::new(&config.dashboard_password);
    if gate.is_enabled() {
        info!("Dashboard password gate enabled");
    } else {
        info!("Dashboard password gate disabled (empty password)");
    }

    let store = SnapshotStore::new();
    let view_options = config.view_options();
    let source = SheetsClient::new(config.feed_url.clone()).context("building feed client")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = spawn_poller(
        Arc::new(source),
        store.clone(),
        view_options.clone(),
        config.poll_interval(),
        shutdown_rx,
    );

    let state = AppState::new(store, gate, view_options, config.poll_interval_ms);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!("outreach-dash listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown requested");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    poller.await.context("joining feed poller")?;

    Ok(())
}
