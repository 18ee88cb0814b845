use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use feed_domain::{Event, FlatRecord};

use crate::{AppError, AppState};

const WRITE_CHUNK: usize = 500;

/// Outcome of one file backfill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub lines: usize,
    pub indexed: usize,
    pub unparseable: usize,
    pub skipped: usize,
}

/// Indexes a newline-delimited JSON dump of feed events, one event per line.
///
/// Bypasses the cursor and live subscribers. Lines that are not events and
/// events that fail to encode are logged and counted; a failed index write
/// stops the backfill with everything before it already stored.
pub async fn backfill_feed_lines<R>(state: &AppState, reader: R) -> Result<BackfillReport, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut report = BackfillReport::default();
    let mut records: Vec<(String, FlatRecord)> = Vec::with_capacity(WRITE_CHUNK);
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.map_err(anyhow::Error::from)? {
        report.lines += 1;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(err) => {
                warn!(line = report.lines, "skipping unparseable feed line: {}", err);
                report.unparseable += 1;
                continue;
            }
        };
        match state.encoder.encode(&event, state.names.as_ref()).await {
            Ok(record) => records.push((event.id, record)),
            Err(err) => {
                warn!(event_id = %event.id, "failed to encode event: {}", err);
                state.metrics.record_encode_error();
                report.skipped += 1;
            }
        }
        if records.len() >= WRITE_CHUNK {
            flush(state, &mut records, &mut report).await?;
        }
    }
    flush(state, &mut records, &mut report).await?;

    info!(
        lines = report.lines,
        indexed = report.indexed,
        unparseable = report.unparseable,
        skipped = report.skipped,
        "feed backfill finished"
    );
    Ok(report)
}

async fn flush(
    state: &AppState,
    records: &mut Vec<(String, FlatRecord)>,
    report: &mut BackfillReport,
) -> Result<(), AppError> {
    if records.is_empty() {
        return Ok(());
    }
    if let Err(err) = state.event_index.insert_records(records).await {
        state.metrics.record_index_write_error();
        return Err(AppError::Internal(err));
    }
    report.indexed += records.len();
    state.metrics.record_ingest(records.len());
    records.clear();
    Ok(())
}
