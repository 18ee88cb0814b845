use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures_util::stream::{Stream, StreamExt};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{error, warn};

use feed_application::AppState;
use feed_domain::FeedBatch;

use crate::error::HttpError;
use crate::middleware::authorize;

const KEEP_ALIVE_SECONDS: u64 = 15;

/// `GET /v1/sse`: one `message` event per ingested batch, `{"data":[...]}`.
pub async fn stream_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let batches = BroadcastStream::new(state.feed_hub.subscribe());
    let events = batches.filter_map(|item| {
        std::future::ready(to_sse_event(item).map(Ok::<_, Infallible>))
    });
    Ok(Sse::new(events)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECONDS))))
}

fn to_sse_event(item: Result<FeedBatch, BroadcastStreamRecvError>) -> Option<SseEvent> {
    match item {
        Ok(batch) => match SseEvent::default().json_data(&batch) {
            Ok(event) => Some(event),
            Err(err) => {
                error!("failed to serialize feed batch: {}", err);
                None
            }
        },
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            warn!(skipped, "feed subscriber lagged behind");
            None
        }
    }
}
