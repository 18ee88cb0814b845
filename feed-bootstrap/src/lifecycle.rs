use std::path::Path;

use anyhow::{Context, Result};
use axum::Router;
use tokio::fs::File;
use tokio::io::BufReader;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use feed_application::commands::backfill_commands::backfill_feed_lines;
use feed_application::AppState;
use feed_infrastructure::run_feed_poller;
use feed_interfaces_http::build_router;

use crate::context::AppContext;

const MAX_BODY_BYTES: usize = 64 * 1024;

fn build_router_with_layers(state: AppState) -> Router {
    build_router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(
            state.config.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_standalone() -> Result<()> {
    let context = AppContext::new().await?;
    let state = context.state;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = if state.config.poller_enabled {
        Some(tokio::spawn(run_feed_poller(
            state.clone(),
            context.feed_source,
            shutdown_rx,
        )))
    } else {
        info!("feed poller disabled");
        None
    };

    let app = build_router_with_layers(state.clone());
    let addr: std::net::SocketAddr = state.config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(poller) = poller {
        if let Err(err) = poller.await {
            warn!("feed poller task failed: {}", err);
        }
    }
    Ok(())
}

/// Backfills the index from a feed dump file and returns; no server, no poller.
pub async fn run_ingest_file(path: &Path) -> Result<()> {
    let context = AppContext::new().await?;
    let file = File::open(path)
        .await
        .with_context(|| format!("failed to open feed dump {}", path.display()))?;
    info!(path = %path.display(), "backfilling index from feed dump");

    let report = backfill_feed_lines(&context.state, BufReader::new(file)).await?;
    if report.unparseable > 0 || report.skipped > 0 {
        warn!(
            unparseable = report.unparseable,
            skipped = report.skipped,
            "some feed lines were not indexed"
        );
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
