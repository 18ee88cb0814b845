use serde::Serialize;
use tracing::{debug, warn};

use feed_domain::{Event, FeedBatch};

use crate::{AppError, AppState};

/// Outcome of one ingested fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub fetched: usize,
    pub fresh: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub subscribers: usize,
}

/// Deduplicates a fetch against the cursor, publishes the fresh events to
/// live subscribers and writes them to the index.
///
/// Events that fail to encode are logged and skipped. A failed index write
/// fails the whole batch; the cursor has already moved past it.
pub async fn ingest_feed_batch(
    state: &AppState,
    events: Vec<Event>,
) -> Result<IngestReport, AppError> {
    let fetched = events.len();
    let fresh = { state.cursor.lock().await.accept(events) };
    let mut report = IngestReport {
        fetched,
        fresh: fresh.len(),
        ..IngestReport::default()
    };
    if fresh.is_empty() {
        debug!(fetched, "no new events in feed batch");
        return Ok(report);
    }

    let batch = FeedBatch { data: fresh };
    report.subscribers = state.feed_hub.publish(&batch);

    let mut records = Vec::with_capacity(batch.data.len());
    for event in &batch.data {
        match state.encoder.encode(event, state.names.as_ref()).await {
            Ok(record) => records.push((event.id.clone(), record)),
            Err(err) => {
                warn!(event_id = %event.id, "failed to encode event: {}", err);
                state.metrics.record_encode_error();
                report.skipped += 1;
            }
        }
    }

    if !records.is_empty() {
        if let Err(err) = state.event_index.insert_records(&records).await {
            state.metrics.record_index_write_error();
            return Err(AppError::Internal(err));
        }
    }

    report.indexed = records.len();
    state.metrics.record_ingest(report.indexed);
    Ok(report)
}
