use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use feed_application::commands::ingest_commands::ingest_feed_batch;
use feed_application::AppState;
use feed_domain::FeedSource;

/// Polls the feed until `shutdown` flips to true. Failures are logged and the
/// next tick tries again.
pub async fn run_feed_poller(
    state: AppState,
    source: Arc<dyn FeedSource>,
    mut shutdown: watch::Receiver<bool>,
) {
    let period = Duration::from_millis(state.config.poll_interval_ms.max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    info!(interval_ms = state.config.poll_interval_ms, "feed poller started");

    loop {
        tokio::select! {
            _ = ticker.tick() => poll_once(&state, source.as_ref()).await,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("feed poller stopped");
}

async fn poll_once(state: &AppState, source: &dyn FeedSource) {
    let start = { state.cursor.lock().await.start() };
    let events = match source.fetch(start).await {
        Ok(events) => events,
        Err(err) => {
            error!("feed fetch failed: {:#}", err);
            return;
        }
    };
    match ingest_feed_batch(state, events).await {
        Ok(report) if report.fresh > 0 => info!(
            fresh = report.fresh,
            indexed = report.indexed,
            skipped = report.skipped,
            "ingested new events"
        ),
        Ok(_) => {}
        Err(err) => error!("feed ingest failed: {}", err),
    }
}
