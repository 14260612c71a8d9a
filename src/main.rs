//! Back-office cache server
//!
//! Serves the cache and rate limiter over HTTP and keeps both swept.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backoffice_cache::{api::create_router, spawn_sweep_task, AppState, Config, SweepHandle};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and the per-class rate limiters
/// 4. Start the cache and rate limit sweep tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting back-office cache server");

    let config = Config::from_env();
    info!(
        port = config.server_port,
        default_ttl_secs = config.default_ttl,
        max_entries = ?config.max_entries,
        cache_sweep_secs = config.cache_sweep_interval,
        rate_limit_sweep_secs = config.rate_limit_sweep_interval,
        "configuration loaded"
    );

    let state = AppState::from_config(&config);

    let sweeps = vec![
        spawn_sweep_task(state.cache.clone(), config.cache_sweep_interval(), "cache"),
        spawn_sweep_task(
            state.limiters.clone(),
            config.rate_limit_sweep_interval(),
            "rate_limit",
        ),
    ];
    info!("Background sweep tasks started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Connect info feeds the client address into rate limit keys
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(sweeps))
    .await
    .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeps.
async fn shutdown_signal(sweeps: Vec<SweepHandle>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for sweep in sweeps {
        sweep.stop();
    }
    warn!("Sweep tasks stopped");
}
